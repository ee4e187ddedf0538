//! Spoken texts. Commas are deliberate: they give the speech synthesizer
//! pauses.

use crate::store::ProcedureSummary;

use super::DialoguePhase;

pub const SELECT_A_NUMBER: &str = "Please select a number!";

pub const CANCELLED: &str = "You asked me to cancel. I will now restart, and you can ask me to start an experiment again.";

pub const FINISHED: &str = "Very good! You have finished the procedure. The session ends here. I will now restart, and you can ask me to start an experiment again.";

pub const NOTHING_SAID_YET: &str =
    "I did not say anything yet! Ask me for help, and I will tell what you can do!";

pub const DO_NOT_REMEMBER: &str = "I don't remember what I just said either... Sorry...";

pub const LIST_UNAVAILABLE: &str =
    "I couldn't reach the procedure list. Please ask me again in a moment.";

pub const DETAIL_UNAVAILABLE: &str =
    "I couldn't reach the procedure details. Please confirm again in a moment, or cancel.";

pub const STEPS_UNAVAILABLE: &str =
    "I couldn't reach the procedure steps. Please ask me to start again in a moment.";

pub const NOT_UNDERSTOOD: &str =
    "Sorry, I did not catch that. Please wake me up, and say it again.";

pub const NO_STEPS: &str =
    "This procedure has no steps yet. You can ask me to cancel, and choose another one.";

const GENERIC_INSTRUCTIONS: &str = "At anytime, you can call me by my name, and ask for help, like you did now. Other things I can always do is to, repeat everything I say, if you want to hear it again. When you tell me to cancel, I will interrupt any task, and restart.";

/// Enumerate procedures as "1. Title. 2. Title."
#[must_use]
pub fn procedure_list(procedures: &[ProcedureSummary]) -> String {
    procedures
        .iter()
        .map(|p| format!("{}. {}.", p.id, p.title))
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn procedures_found(count: usize, list_text: &str) -> String {
    format!(
        "I have found, {count} Procedures. You can, wake me up, and tell me the number, to select a procedure. At any time, you can ask me to repeat, to listen to the information again. You can also, ask me to cancel, and I will restart. Here are the procedures. {list_text}"
    )
}

#[must_use]
pub fn procedures_again(list_text: &str) -> String {
    format!(
        "Okay! You can, wake me up, and tell me the number, to select a procedure. Here are, the procedures, again. {list_text}"
    )
}

#[must_use]
pub fn procedure_not_found(id: u32, list_text: &str) -> String {
    format!("I could not find procedure {id}. Here are, the procedures, again. {list_text}")
}

#[must_use]
pub fn confirm_selection(id: u32, title: &str) -> String {
    format!("You selected {id}, {title}. Is this correct?")
}

#[must_use]
pub fn briefing(title: &str, total_steps: usize, resources: &str) -> String {
    format!(
        "All right! Here is, procedure {title}. It has {total_steps} steps. Let me know, when you're ready to start. For this procedure, you will need. {resources}"
    )
}

#[must_use]
pub fn briefing_again(title: &str, total_steps: usize, resources: &str) -> String {
    format!(
        "Of course! Let me know, when you're ready, to start the procedure {title}. It has {total_steps} steps. Here is, what you will need, again. {resources}"
    )
}

#[must_use]
pub fn first_step(description: &str) -> String {
    format!(
        "Absolutely! Let's start! When you are ready for the next step, please say next step! Here is the first step. {description}"
    )
}

#[must_use]
pub fn only_step(description: &str) -> String {
    format!(
        "Absolutely! Let's start! This procedure has only one step. Please tell me, when you are ready to finish. Here it is. {description}"
    )
}

#[must_use]
pub fn first_step_again(description: &str) -> String {
    format!(
        "Okay! When you are ready, for the next step, please say next step! Here is, the first step, again. {description}"
    )
}

#[must_use]
pub fn step_of(current: usize, total: usize, description: &str) -> String {
    format!("Here is step {current} out of {total}. {description}")
}

#[must_use]
pub fn step_of_again(current: usize, total: usize, description: &str) -> String {
    format!("This is step {current} out of {total} again. {description}")
}

#[must_use]
pub fn last_step(description: &str) -> String {
    format!(
        "You are almost done! Please tell me, when you are ready to finish. The last step is {description}"
    )
}

#[must_use]
pub fn last_step_again(description: &str) -> String {
    format!("All right! Please tell me when you are done. The last step is. {description}")
}

/// Generic help plus what the user can do in `phase`.
#[must_use]
pub fn manual(phase: DialoguePhase) -> String {
    match phase {
        DialoguePhase::Idle => format!(
            "I am here to help you with scientific experiments. {GENERIC_INSTRUCTIONS} Right now, you can call me and say that you want to start an experiment!"
        ),
        DialoguePhase::Listing => format!(
            "Here are some of the things you can ask me. {GENERIC_INSTRUCTIONS} Right now, you can call me and say the number of the procedure you want to select!"
        ),
        DialoguePhase::AwaitingConfirmation => format!(
            "Here are some of the things you can ask me. {GENERIC_INSTRUCTIONS} Right now, you can tell me, yes or no, to confirm the procedure you selected!"
        ),
        DialoguePhase::Briefing => format!(
            "Here are some of the things you can ask me. {GENERIC_INSTRUCTIONS} Right now, you can call me, and say that, you are ready, to start the procedure!"
        ),
        DialoguePhase::Stepping => format!(
            "Here are some of the things you can ask me. {GENERIC_INSTRUCTIONS} Right now, you can call me, and ask me for the next step!"
        ),
        DialoguePhase::LastStep => format!(
            "Here are some of the things you can ask me. {GENERIC_INSTRUCTIONS} Right now, you can call me, and ask me to finish the procedure!"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedure_list_numbering() {
        let procedures = vec![
            ProcedureSummary::new(1, "Growing Lettuce"),
            ProcedureSummary::new(2, "Testing Soil"),
        ];
        assert_eq!(
            procedure_list(&procedures),
            "1. Growing Lettuce. 2. Testing Soil."
        );
        assert_eq!(procedure_list(&[]), "");
    }

    #[test]
    fn test_manual_has_generic_part_and_hint() {
        for phase in DialoguePhase::ALL {
            let text = manual(phase);
            assert!(text.contains(GENERIC_INSTRUCTIONS));
            assert!(text.contains("Right now"));
        }
        assert!(manual(DialoguePhase::LastStep).contains("finish the procedure"));
    }

    #[test]
    fn test_step_texts() {
        assert_eq!(step_of(2, 5, "Water it."), "Here is step 2 out of 5. Water it.");
        assert!(last_step("Harvest.").contains("almost done"));
        assert!(!last_step("Harvest.").contains("out of"));
    }
}
