//! Recommendation catalog

use super::{Recommendation, TimeOfDay};

pub(super) fn mood_boost() -> Recommendation {
    Recommendation::new(
        "mood_boost",
        "Mood-Boosting Activities",
        "Engage in activities that can help improve your mood",
        "Try listening to uplifting music, going for a walk in nature, or doing something creative like drawing or writing.",
        2,
        "15-30 minutes",
    )
}

pub(super) fn social_connection() -> Recommendation {
    Recommendation::new(
        "social_connection",
        "Connect with Others",
        "Reach out to friends, family, or support groups",
        "Call or text someone you care about. Social connection can significantly improve mood.",
        2,
        "10-20 minutes",
    )
}

pub(super) fn mood_maintenance() -> Recommendation {
    Recommendation::new(
        "mood_maintenance",
        "Maintain Positive Mood",
        "Keep up the good work and maintain your positive mood",
        "Continue doing what's working for you. Consider journaling about what's contributing to your good mood.",
        3,
        "10 minutes",
    )
}

pub(super) fn deep_relaxation() -> Recommendation {
    Recommendation::new(
        "stress_relief",
        "Deep Relaxation Session",
        "Take time for a comprehensive stress relief session",
        "Try progressive muscle relaxation, guided meditation, or a calming bath. Focus on deep breathing.",
        1,
        "30 minutes",
    )
}

pub(super) fn quick_stress_relief() -> Recommendation {
    Recommendation::new(
        "quick_stress_relief",
        "Quick Stress Relief",
        "Fast techniques to reduce stress in the moment",
        "Try the 4-7-8 breathing technique: Inhale for 4 counts, hold for 7, exhale for 8. Repeat 3 times.",
        1,
        "5 minutes",
    )
}

pub(super) fn stress_management() -> Recommendation {
    Recommendation::new(
        "stress_management",
        "Stress Management Techniques",
        "Practice techniques to manage moderate stress",
        "Try mindfulness meditation, gentle stretching, or a short walk. Focus on being present in the moment.",
        2,
        "15 minutes",
    )
}

pub(super) fn depression_professional_support() -> Recommendation {
    Recommendation::new(
        "professional_help",
        "Professional Support for Depression",
        "Consider seeking professional help for depression",
        "Depression is treatable. Consider reaching out to a therapist or counselor who specializes in depression treatment.",
        1,
        "Ongoing",
    )
}

pub(super) fn depression_management() -> Recommendation {
    Recommendation::new(
        "depression_management",
        "Depression Management Strategies",
        "Evidence-based strategies for managing depression",
        "Try behavioral activation: engage in activities you used to enjoy, even if you don't feel like it. Start small.",
        2,
        "20-30 minutes",
    )
}

pub(super) fn anxiety_management() -> Recommendation {
    Recommendation::new(
        "anxiety_management",
        "Anxiety Management Techniques",
        "Proven techniques for managing anxiety",
        "Practice grounding techniques: Name 5 things you can see, 4 you can touch, 3 you can hear, 2 you can smell, 1 you can taste.",
        2,
        "10-15 minutes",
    )
}

pub(super) fn for_time_of_day(time_of_day: TimeOfDay) -> Option<Recommendation> {
    match time_of_day {
        TimeOfDay::Morning => Some(Recommendation::new(
            "morning_routine",
            "Morning Mental Health Routine",
            "Start your day with positive mental health practices",
            "Try gratitude journaling, gentle stretching, or a short meditation to set a positive tone for your day.",
            3,
            "10-15 minutes",
        )),
        TimeOfDay::Evening => Some(Recommendation::new(
            "evening_wind_down",
            "Evening Wind-Down Routine",
            "Prepare your mind and body for restful sleep",
            "Create a calming bedtime routine: dim lights, avoid screens, try gentle breathing exercises or light reading.",
            3,
            "20-30 minutes",
        )),
        TimeOfDay::Afternoon => None,
    }
}

pub(super) fn gentle_activity() -> Recommendation {
    Recommendation::new(
        "gentle_activity",
        "Gentle Physical Activity",
        "Low-impact activities for mental wellness",
        "Try gentle yoga, tai chi, or a leisurely walk. Physical activity releases endorphins that improve mood.",
        3,
        "20-30 minutes",
    )
}

pub(super) fn energetic_activity() -> Recommendation {
    Recommendation::new(
        "energetic_activity",
        "Energetic Physical Activity",
        "Higher intensity activities for stress relief",
        "Try running, dancing, or a workout session. High-intensity exercise can be very effective for stress relief.",
        3,
        "30-45 minutes",
    )
}

pub(super) fn professional_help() -> [Recommendation; 2] {
    [
        Recommendation::new(
            "professional_help",
            "Mental Health Professional",
            "Connect with a qualified mental health professional",
            "Consider reaching out to a therapist, psychologist, or psychiatrist. They can provide specialized treatment and support.",
            1,
            "Ongoing",
        ),
        Recommendation::new(
            "support_group",
            "Support Group",
            "Join a support group for shared experiences",
            "Support groups can provide understanding, shared experiences, and practical advice from others facing similar challenges.",
            2,
            "1-2 hours weekly",
        ),
    ]
}

/// Fixed crisis resources, independent of any profile
#[must_use]
pub fn emergency_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation::new(
            "crisis_support",
            "Crisis Support Resources",
            "Immediate help is available 24/7",
            "National Suicide Prevention Lifeline: 988\nCrisis Text Line: Text HOME to 741741\nEmergency Services: 911",
            1,
            "Immediate",
        )
        .emergency(),
        Recommendation::new(
            "professional_help",
            "Emergency Mental Health Services",
            "Connect with emergency mental health professionals",
            "Contact your local emergency room or mental health crisis center immediately",
            1,
            "Immediate",
        )
        .emergency(),
        Recommendation::new(
            "support_system",
            "Reach Out to Support System",
            "Contact trusted friends, family, or support groups",
            "Call or text someone you trust. You don't have to go through this alone.",
            1,
            "5-10 minutes",
        )
        .emergency(),
    ]
}

/// One short practice for the part of the day containing `hour`
#[must_use]
pub fn daily_recommendations(hour: u32) -> Vec<Recommendation> {
    let recommendation = match TimeOfDay::from_hour(hour) {
        TimeOfDay::Morning => Recommendation::new(
            "morning_mindfulness",
            "Morning Mindfulness",
            "Start your day with intention and awareness",
            "Take 5 minutes to sit quietly and set an intention for your day. What do you want to focus on?",
            3,
            "5 minutes",
        ),
        TimeOfDay::Afternoon => Recommendation::new(
            "afternoon_break",
            "Afternoon Mental Break",
            "Take a break to recharge your mental energy",
            "Step away from work and take a 10-minute walk or do some gentle stretching.",
            3,
            "10 minutes",
        ),
        TimeOfDay::Evening => Recommendation::new(
            "evening_reflection",
            "Evening Reflection",
            "Reflect on your day and prepare for rest",
            "Write down three things that went well today and one thing you're grateful for.",
            3,
            "10 minutes",
        ),
    };
    vec![recommendation]
}

/// Weekly planning suggestions; adds a stress plan above stress level 6
#[must_use]
pub fn weekly_recommendations(stress_level: i32) -> Vec<Recommendation> {
    let mut recommendations = vec![
        Recommendation::new(
            "weekly_planning",
            "Weekly Mental Health Check-in",
            "Review your week and plan for the next one",
            "Take 15 minutes to reflect on your week. What went well? What challenges did you face? Plan one self-care activity for next week.",
            3,
            "15 minutes",
        ),
        Recommendation::new(
            "goal_setting",
            "Set Weekly Mental Health Goals",
            "Create achievable goals for your mental wellness",
            "Set 2-3 small, achievable goals for this week. Examples: practice mindfulness 3 times, exercise twice, or reach out to a friend.",
            3,
            "10 minutes",
        ),
    ];

    if stress_level > 6 {
        recommendations.push(Recommendation::new(
            "stress_management",
            "Weekly Stress Management Plan",
            "Create a plan to manage stress this week",
            "Identify your main stress sources and plan specific coping strategies. Schedule regular breaks and relaxation time.",
            2,
            "20 minutes",
        ));
    }
    recommendations
}
