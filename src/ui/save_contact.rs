//! Shared contact-write flow used by the scan and create screens: prompt
//! for the contacts capability, write once, report the outcome.

use std::cell::RefCell;

use crate::app::AppContext;
use crate::contact::ContactRecord;
use crate::platform::contacts::{ContactError, ContactId, ContactStore, NewContact};
use crate::platform::permissions::{Capability, Decision, PermissionBroker};
use crate::utils;

/// What the user gets told after a save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Denied,
    Saved { name: String },
    Failed,
}

impl SaveOutcome {
    pub fn notice(&self) -> String {
        match self {
            SaveOutcome::Denied => "Permission to save contacts denied.".to_string(),
            SaveOutcome::Saved { name } => format!("{name} is now connected!"),
            SaveOutcome::Failed => "An error occurred while saving the contact.".to_string(),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

fn write_outcome(name: &str, result: Result<ContactId, ContactError>) -> SaveOutcome {
    match result {
        Ok(id) => {
            log::info!("contact saved with id {id}");
            SaveOutcome::Saved {
                name: name.to_string(),
            }
        }
        Err(err) => {
            log::error!("saving contact failed: {err}");
            SaveOutcome::Failed
        }
    }
}

/// Asks for the contacts capability (a fresh prompt on every call), writes
/// the record exactly once, and reports the outcome. The write runs on the
/// worker runtime; `done` fires on the main context once the attempt
/// settles, or immediately on denial.
pub fn save_contact(ctx: &AppContext, record: ContactRecord, done: impl FnOnce(SaveOutcome) + 'static) {
    let store = ctx.contacts.clone();
    ctx.permissions.request(
        Capability::Contacts,
        Box::new(move |decision| {
            if decision == Decision::Denied {
                done(SaveOutcome::Denied);
                return;
            }
            let contact = NewContact::mobile(&record.name, &record.phone_number);
            let name = record.name.clone();
            let rx = utils::run_async_to_main(async move { store.add(&contact) });
            let done = RefCell::new(Some(done));
            rx.attach(None, move |result| {
                if let Some(done) = done.borrow_mut().take() {
                    done(write_outcome(&name, result));
                }
                glib::ControlFlow::Break
            });
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_success_maps_to_saved_with_name() {
        let outcome = write_outcome("Ada", Ok(ContactId(7)));
        assert_eq!(
            outcome,
            SaveOutcome::Saved {
                name: "Ada".to_string()
            }
        );
        assert!(outcome.is_saved());
    }

    #[test]
    fn store_error_maps_to_failed() {
        let outcome = write_outcome("Ada", Err(ContactError::InvalidRecord));
        assert_eq!(outcome, SaveOutcome::Failed);
        assert!(!outcome.is_saved());
    }

    #[test]
    fn notices_match_the_user_facing_strings() {
        assert_eq!(
            SaveOutcome::Saved {
                name: "Ada".to_string()
            }
            .notice(),
            "Ada is now connected!"
        );
        assert_eq!(
            SaveOutcome::Denied.notice(),
            "Permission to save contacts denied."
        );
        assert_eq!(
            SaveOutcome::Failed.notice(),
            "An error occurred while saving the contact."
        );
    }
}
