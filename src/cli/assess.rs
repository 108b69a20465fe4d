//! `solace assess` and the questionnaire prompts shared with `chat`

use super::input::LineInput;
use solace_core::assessment::{questions_for, score};
use solace_core::{AssessmentKind, AssessmentResult, Question};
use std::collections::BTreeMap;

/// Run a questionnaire without a session and print the scored result
pub async fn run(kind: &str) -> anyhow::Result<()> {
    let kind: AssessmentKind = kind.parse()?;
    let questions = questions_for(kind);
    let mut input = LineInput::stdin();

    println!("{} ({} questions)", kind.display_name(), questions.len());
    let mut responses = BTreeMap::new();
    for question in &questions {
        let Some(value) = ask(&mut input, question).await? else {
            println!("Input closed, scoring the answers given so far.");
            break;
        };
        responses.insert(question.id.clone(), value);
    }

    print_result(&score(kind, &responses));
    Ok(())
}

/// Ask until the answer is one of the question's options; `None` at end of input
pub(crate) async fn ask(input: &mut LineInput, question: &Question) -> anyhow::Result<Option<i32>> {
    println!("\n{}", question.text);
    for option in &question.options {
        println!("  {}) {}", option.value, option.label);
    }
    loop {
        let Some(line) = input.read("answer> ").await? else {
            return Ok(None);
        };
        match line.trim().parse::<i32>() {
            Ok(value) if question.accepts(value) => return Ok(Some(value)),
            _ => println!("Please enter one of the listed numbers."),
        }
    }
}

pub(crate) fn print_result(result: &AssessmentResult) {
    println!(
        "\n{}: {}/{} ({})",
        result.kind.display_name(),
        result.total_score,
        result.max_score,
        result.severity_level.phrase()
    );
    println!("{}", result.interpretation);
    for advice in &result.recommendations {
        println!("  - {advice}");
    }
}
