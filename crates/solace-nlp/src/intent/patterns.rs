//! Regex tables per intent

use super::types::Intent;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const PATTERN_TABLE: &[(Intent, &[&str])] = &[
    (
        Intent::Greeting,
        &[
            r"hi|hello|hey|good morning|good afternoon|good evening",
            r"how are you|how do you do",
            r"nice to meet you|pleased to meet you",
        ],
    ),
    (
        Intent::Farewell,
        &[
            r"bye|goodbye|see you|take care|farewell",
            r"thanks|thank you|thank you very much",
            r"that's all|that's it|nothing else",
        ],
    ),
    (
        Intent::Crisis,
        &[
            r"kill myself|suicide|end it all|not worth living",
            r"hurt myself|self harm|cut myself|overdose",
            r"jump off|hang myself|die|death|dead",
            r"better off dead|want to die|end my life",
        ],
    ),
    (
        Intent::Depression,
        &[
            r"depressed|depression|sad|hopeless|worthless",
            r"empty|guilty|shame|down|low",
            r"can't get out of bed|no energy|tired",
            r"lost interest|no pleasure|nothing matters",
        ],
    ),
    (
        Intent::Anxiety,
        &[
            r"anxious|anxiety|worried|worry|panic",
            r"nervous|stressed|stress|overwhelmed",
            r"fear|afraid|scared|frightened",
            r"racing thoughts|can't stop worrying",
        ],
    ),
    (
        Intent::SleepIssues,
        &[
            r"can't sleep|insomnia|sleep problems",
            r"tossing and turning|wake up|nightmares",
            r"tired|exhausted|sleepy|drowsy",
        ],
    ),
    (
        Intent::RelationshipIssues,
        &[
            r"relationship|partner|boyfriend|girlfriend|spouse",
            r"family|parents|siblings|children",
            r"friends|social|lonely|isolated",
            r"conflict|argument|fight|breakup",
        ],
    ),
    (
        Intent::WorkStress,
        &[
            r"work|job|career|boss|colleague",
            r"deadline|pressure|overwhelmed|burnout",
            r"workplace|office|meeting|project",
        ],
    ),
    (
        Intent::AssessmentRequest,
        &[
            r"assessment|test|evaluation|check",
            r"how am i doing|am i depressed|am i anxious",
            r"mental health check|screening",
        ],
    ),
    (
        Intent::RecommendationRequest,
        &[
            r"help|advice|suggestion|recommendation",
            r"what should i do|how to cope|strategies",
            r"tips|techniques|exercises",
        ],
    ),
    (
        Intent::MoodTracking,
        &[
            r"mood|feeling|emotion|track",
            r"how am i feeling|mood today|emotional state",
            r"log|record|journal",
        ],
    ),
    (
        Intent::ProfessionalHelp,
        &[
            r"therapist|psychologist|psychiatrist|counselor",
            r"professional help|therapy|counseling",
            r"mental health professional|doctor",
        ],
    ),
    (
        Intent::Medication,
        &[
            r"medication|medicine|pills|prescription",
            r"antidepressant|anxiety medication|meds",
            r"side effects|dosage|taking medication",
        ],
    ),
    (
        Intent::CopingStrategies,
        &[
            r"coping|deal with|handle|manage",
            r"breathing|meditation|mindfulness",
            r"exercise|walk|run|yoga",
        ],
    ),
    (
        Intent::GeneralQuestion,
        &[
            r"what|how|why|when|where|who",
            r"can you|could you|would you",
            r"explain|tell me|describe",
        ],
    ),
];

static COMPILED: LazyLock<Vec<(Intent, Vec<Regex>)>> = LazyLock::new(|| {
    PATTERN_TABLE
        .iter()
        .map(|(intent, alternatives)| {
            let regexes = alternatives
                .iter()
                .map(|alt| {
                    Regex::new(&format!(r"(?i)\b({alt})\b"))
                        .expect("intent pattern is a compile-time constant")
                })
                .collect();
            (*intent, regexes)
        })
        .collect()
});

/// Share of each intent's patterns that match, for intents with any match
#[must_use]
pub fn pattern_scores(text: &str) -> BTreeMap<Intent, f64> {
    let mut scores = BTreeMap::new();
    for (intent, regexes) in COMPILED.iter() {
        let matched = regexes.iter().filter(|re| re.is_match(text)).count();
        if matched > 0 {
            let score = (matched as f64 / regexes.len() as f64).min(1.0);
            scores.insert(*intent, score);
        }
    }
    scores
}
