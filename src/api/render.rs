//! English wording for [`Prompt`]s. This is the only place user-facing text lives.

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;

use crate::api::models::{ButtonView, RenderedReply};
use crate::constants::MAX_PARTICIPANTS;
use crate::core::errors::ValidationError;
use crate::core::models::{
    bill::PersonLabel,
    event::{Action, BillSummary, Prompt, Reply},
    session::BillType,
};

pub fn render(reply: &Reply) -> RenderedReply {
    RenderedReply {
        text: render_prompt(&reply.prompt),
        buttons: reply
            .actions
            .iter()
            .map(|&action| ButtonView {
                label: button_label(action).to_string(),
                action: action.as_str().to_string(),
            })
            .collect(),
    }
}

fn button_label(action: Action) -> &'static str {
    match action {
        Action::AcceptNames => "✅ Yes, add names",
        Action::DeclineNames => "❌ No, keep them anonymous",
        Action::FinishEarly => "🏁 Finish bill",
        Action::ShowMenu => "📋 Menu",
        Action::Help => "ℹ️ Help",
        Action::ViewBills => "📊 View my bills",
    }
}

pub fn money(amount: Decimal) -> String {
    format!(
        "${:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

fn person_name(person: &PersonLabel) -> String {
    match &person.name {
        Some(name) => name.clone(),
        None => format!("Person {}", person.number),
    }
}

fn render_prompt(prompt: &Prompt) -> String {
    match prompt {
        Prompt::Welcome => "👋 **Welcome to Shin Mal!**\n\n\
            I split group bills and tell everyone who owes whom.\n\n\
            • /single - one person paid the full amount\n\
            • /multi - several people paid different amounts\n\
            • /menu - more options"
            .to_string(),
        Prompt::Menu => "🧾 **Shin Mal - Bill Split Calculator**\n\n\
            **💳 Quick Commands:**\n\
            • /single - One person paid the full amount\n\
            • /multi - Multiple people paid different amounts"
            .to_string(),
        Prompt::Help => format!(
            "ℹ️ **How it works**\n\n\
            1. Start with /single or /multi\n\
            2. Name the bill\n\
            3. Say how many people shared it (1-{})\n\
            4. Optionally give everyone a name\n\
            5. Enter what was paid\n\n\
            I'll show each person's share and the transfers that settle the bill.",
            MAX_PARTICIPANTS
        ),
        Prompt::CannotIdentify => "❌ Sorry, I couldn't identify you.".to_string(),
        Prompt::ProcessingError => "❌ Something went wrong processing that. Please try again.".to_string(),
        Prompt::BillHistory { bills } => {
            if bills.is_empty() {
                return "📊 You have no saved bills yet.".to_string();
            }
            let mut text = String::from("📊 **Your bills:**\n\n");
            for (i, bill) in bills.iter().enumerate() {
                let _ = writeln!(
                    text,
                    "{}. **{}** - {} split {} ways ({})",
                    i + 1,
                    bill.title,
                    money(bill.total_amount),
                    bill.participants.len(),
                    bill.created_at.format("%Y-%m-%d")
                );
            }
            text
        }
        Prompt::StartBillCreation { bill_type } => {
            let kind = match bill_type {
                BillType::Single => "one person paid",
                BillType::Multi => "several people paid",
            };
            format!("🧾 **New bill** ({})\n\n**Step 1:** What is this bill for?", kind)
        }
        Prompt::BillNameConfirmed { title } => format!(
            "✅ **Bill name:** {}\n\n**Step 2:** How many people are splitting it? (1-{})",
            title, MAX_PARTICIPANTS
        ),
        Prompt::PeopleCountConfirmed { count } => format!(
            "✅ **People:** {}\n\n**Step 3:** Would you like to add their names?",
            count
        ),
        Prompt::AskNames { count } => format!(
            "✏️ Send {} names separated by commas.\n*Example: Aung, Su, Min*",
            count
        ),
        Prompt::AskTotalAmount { names } => {
            let mut text = names_confirmation(names.as_deref());
            text.push_str("**Step 4:** What was the total amount?\n*Example: 45.50*");
            text
        }
        Prompt::AskPayer { total, options } => {
            let mut text = format!(
                "✅ **Total amount:** {}\n\n**Step 5:** Who paid the full {}?\n\n",
                money(*total),
                money(*total)
            );
            for person in options {
                let _ = writeln!(text, "{}. {}", person.number, person_name(person));
            }
            let _ = write!(text, "\n*Send the person number (1-{})*", options.len());
            text
        }
        Prompt::AskFirstPayment { person, names } => {
            let mut text = names_confirmation(names.as_deref());
            let _ = write!(
                text,
                "**Step 4:** Enter what each person paid.\n\n**{}:** How much did they pay?\n*Example: 25.00*",
                person_name(person)
            );
            text
        }
        Prompt::AskNextPayment { person } => format!(
            "✅ **{}:** How much did they pay?\n*Example: 25.00*",
            person_name(person)
        ),
        Prompt::Rejected(error) => render_rejection(error),
        Prompt::BillSummary(summary) => render_summary(summary),
        Prompt::SaveFailed { reason, fallback } => format!(
            "❌ Could not save the bill ({}). Here is the calculation so it isn't lost:\n\n{}",
            reason, fallback
        ),
    }
}

fn names_confirmation(names: Option<&[String]>) -> String {
    match names {
        Some(names) => format!("✅ **Names:** {}\n\n", names.join(", ")),
        None => String::new(),
    }
}

fn render_rejection(error: &ValidationError) -> String {
    match error {
        ValidationError::EmptyTitle => "❌ Please send a name for the bill.".to_string(),
        ValidationError::NotAWholeNumber | ValidationError::TooFewPeople { .. } => {
            "❌ Please send a valid number of people (at least 1).".to_string()
        }
        ValidationError::TooManyPeople { max } => {
            format!("❌ At most {} people can share a bill.", max)
        }
        ValidationError::NameCountMismatch { expected, got } => format!(
            "❌ Please send exactly {} names separated by commas (got {}).",
            expected, got
        ),
        ValidationError::InvalidTotalAmount => {
            "❌ Please send a valid amount greater than 0.".to_string()
        }
        ValidationError::InvalidPersonNumber { max } => {
            format!("❌ Please send a person number between 1 and {}.", max)
        }
        ValidationError::InvalidPayment => "❌ Please send a valid amount (0 or more).".to_string(),
        ValidationError::AmountTooLarge => {
            "❌ That amount is too large to add to this bill.".to_string()
        }
        ValidationError::ChoiceRequired => "👆 Please use the buttons above.".to_string(),
        ValidationError::ActionNotAvailable => "⚠️ That button is no longer available.".to_string(),
    }
}

fn render_summary(summary: &BillSummary) -> String {
    let settlement = &summary.settlement;
    let name_at = |index: usize| {
        summary
            .people
            .get(index)
            .map(person_name)
            .unwrap_or_else(|| format!("Person {}", index + 1))
    };

    let mut text = format!(
        "📊 **Bill results: {}**\n\n💰 **Total:** {}\n👤 **Per person:** {}\n\n",
        summary.title,
        money(settlement.total_amount),
        money(settlement.per_person)
    );

    let payers: Vec<_> = settlement
        .results
        .iter()
        .filter(|r| r.paid > Decimal::ZERO)
        .collect();
    if !payers.is_empty() {
        text.push_str("**Paid:**\n");
        for (i, r) in payers.iter().enumerate() {
            let _ = writeln!(
                text,
                "{}. **{}:** {}",
                i + 1,
                name_at(r.person_number - 1),
                money(r.paid)
            );
        }
        text.push('\n');
    }

    text.push_str("**Transfers needed:**\n\n");
    if summary.transfers.is_empty() {
        text.push_str("✅ Everyone is settled - no transfers needed!");
    } else {
        for (i, transfer) in summary.transfers.iter().enumerate() {
            let _ = writeln!(
                text,
                "{}. {} → {}: {}",
                i + 1,
                name_at(transfer.from),
                name_at(transfer.to),
                money(transfer.amount)
            );
        }
    }
    text
}
