//! Basic example of driving a Mad Memory session

use madmemory_core::{RuleEngine, SessionController, SessionEvent, SubmitOutcome};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = SessionController::with_seed(42);

    // Pressing a button before activation is a strike
    session.toggle(0)?;
    println!("Strikes after an early press: {}\n", session.strikes());

    loop {
        let stage = session.current_stage();
        let evaluation = RuleEngine::new(session.catalog()).evaluate(session.history(), stage)?;

        println!("{}", stage);
        println!("  Display: {}", session.display_text().unwrap_or(""));
        if let Some(labels) = session.labels() {
            println!("  Labels:  {}", labels);
            println!("  Rule:    {}", evaluation.rule);
            println!("  Answer:  {}", evaluation.mask.describe(&labels));
        }

        for position in evaluation.mask.positions() {
            session.toggle(position)?;
        }

        match session.submit()? {
            SubmitOutcome::Advanced(next) => println!("  Correct, on to {}\n", next),
            SubmitOutcome::Solved => {
                println!("  Correct, solved!");
                break;
            }
            SubmitOutcome::Strike | SubmitOutcome::Ignored => {
                return Err("the rule engine's answer was rejected".into());
            }
        }
    }

    let passes = session
        .drain_events()
        .iter()
        .filter(|e| matches!(e, SessionEvent::Pass { .. }))
        .count();
    println!("\nPass events: {}", passes);

    Ok(())
}
