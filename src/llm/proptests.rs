//! Property-based tests for outbound request construction
//!
//! Whatever the caller sends, the backend must see:
//! - the priming pair as the first two turns
//! - the caller's history afterwards, unchanged and in order

use super::types::{primed_history, validate_request, Message, MessageRole, PRIMING_ACK};
use proptest::prelude::*;

fn arb_message() -> impl Strategy<Value = Message> {
    (any::<bool>(), "[a-zA-Z0-9 _.!?,']{0,80}").prop_map(|(is_user, text)| {
        if is_user {
            Message::user(text)
        } else {
            Message::model(text)
        }
    })
}

fn arb_history() -> impl Strategy<Value = Vec<Message>> {
    proptest::collection::vec(arb_message(), 1..12)
}

proptest! {
    #[test]
    fn prop_priming_pair_always_leads(
        instruction in "[a-zA-Z ]{1,60}",
        history in arb_history(),
    ) {
        let primed = primed_history(&instruction, &history);

        prop_assert_eq!(primed[0].role(), MessageRole::User);
        prop_assert_eq!(primed[0].text(), instruction.as_str());
        prop_assert_eq!(primed[1].role(), MessageRole::Model);
        prop_assert_eq!(primed[1].text(), PRIMING_ACK);
    }

    #[test]
    fn prop_history_preserved_after_priming(
        instruction in "[a-zA-Z ]{1,60}",
        history in arb_history(),
    ) {
        let primed = primed_history(&instruction, &history);

        prop_assert_eq!(primed.len(), history.len() + 2);
        prop_assert_eq!(&primed[2..], history.as_slice());
    }

    #[test]
    fn prop_non_blank_requests_validate(
        instruction in "[a-zA-Z]{1,10}[a-zA-Z ]{0,50}",
        history in arb_history(),
    ) {
        prop_assert!(validate_request(&instruction, &history).is_ok());
    }
}
