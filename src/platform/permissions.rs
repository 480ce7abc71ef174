//! Capability gating. A plain GTK app has no OS permission broker to call,
//! so the gate is an in-app Allow/Deny dialog behind a trait the screens
//! depend on; every call prompts again, nothing is cached.

use std::cell::RefCell;

use adw::prelude::*;
use gtk4 as gtk;

/// OS-mediated capabilities the app asks for before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Camera,
    Contacts,
}

impl Capability {
    fn prompt_body(self) -> &'static str {
        match self {
            Capability::Camera => "Allow access to the camera to scan QR codes?",
            Capability::Contacts => "Allow access to your contacts to save this entry?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Granted,
    Denied,
}

/// Prompts for a capability and reports the user's decision.
pub trait PermissionBroker {
    fn request(&self, capability: Capability, respond: Box<dyn FnOnce(Decision) + 'static>);
}

/// Broker backed by a message dialog on the main window. Closing the dialog
/// without answering counts as a denial.
pub struct PromptBroker {
    window: gtk::Window,
}

impl PromptBroker {
    pub fn new(window: &impl IsA<gtk::Window>) -> Self {
        Self {
            window: window.clone().upcast(),
        }
    }
}

impl PermissionBroker for PromptBroker {
    fn request(&self, capability: Capability, respond: Box<dyn FnOnce(Decision) + 'static>) {
        let dialog = adw::MessageDialog::new(
            Some(&self.window),
            Some("Permission Required"),
            Some(capability.prompt_body()),
        );
        dialog.add_response("deny", "Deny");
        dialog.add_response("allow", "Allow");
        dialog.set_response_appearance("allow", adw::ResponseAppearance::Suggested);
        dialog.set_default_response(Some("allow"));
        dialog.set_close_response("deny");

        let respond = RefCell::new(Some(respond));
        dialog.connect_response(None, move |_, response| {
            if let Some(respond) = respond.borrow_mut().take() {
                let decision = if response == "allow" {
                    Decision::Granted
                } else {
                    Decision::Denied
                };
                respond(decision);
            }
        });
        dialog.present();
    }
}
