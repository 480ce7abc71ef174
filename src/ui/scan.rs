//! Scanner screen. Requests the camera capability on mount, streams
//! detections from the camera feed while armed, and pauses on a result
//! until the user chooses to scan again.

use std::cell::RefCell;
use std::rc::Rc;

use adw::prelude::*;
use gtk4 as gtk;

use crate::app::AppContext;
use crate::contact;
use crate::platform::camera::{CameraFeed, CameraSession};
use crate::platform::permissions::{Capability, PermissionBroker};
use crate::scan::{ScanEvent, ScanState};
use crate::ui::save_contact::save_contact;
use crate::utils;

struct ScanScreen {
    ctx: Rc<AppContext>,
    state: RefCell<ScanState>,
    session: RefCell<Option<CameraSession>>,
    detections: glib::Sender<String>,
    stack: gtk::Stack,
}

impl ScanScreen {
    fn apply(&self, event: ScanEvent) -> ScanState {
        let next = self.state.borrow().clone().apply(event);
        *self.state.borrow_mut() = next.clone();
        next
    }

    fn arm(&self) {
        *self.session.borrow_mut() = Some(self.ctx.camera.activate(self.detections.clone()));
        self.stack.set_visible_child_name("scanning");
    }

    /// Drops the camera session, unsubscribing from detections.
    fn pause(&self) {
        self.session.borrow_mut().take();
    }
}

pub fn build(ctx: Rc<AppContext>) -> gtk::Widget {
    let stack = gtk::Stack::new();
    stack.set_vexpand(true);

    let pending = gtk::Box::new(gtk::Orientation::Vertical, 12);
    pending.set_valign(gtk::Align::Center);
    let spinner = gtk::Spinner::new();
    spinner.set_size_request(32, 32);
    spinner.start();
    let pending_label = gtk::Label::new(Some("Requesting camera permission..."));
    pending.append(&spinner);
    pending.append(&pending_label);
    stack.add_named(&pending, Some("pending"));

    let denied = adw::StatusPage::builder()
        .icon_name("camera-disabled-symbolic")
        .title("No access to camera")
        .description("Leave and reopen this screen to ask again.")
        .build();
    stack.add_named(&denied, Some("denied"));

    let scanning = adw::StatusPage::builder()
        .icon_name("camera-photo-symbolic")
        .title("Point the camera at a QR code")
        .build();
    stack.add_named(&scanning, Some("scanning"));

    stack.set_visible_child_name("pending");

    let (tx, rx) = utils::glib_channel::<String>();
    let screen = Rc::new(ScanScreen {
        ctx: ctx.clone(),
        state: RefCell::new(ScanState::new()),
        session: RefCell::new(None),
        detections: tx,
        stack: stack.clone(),
    });

    // Fresh prompt on every mount.
    {
        let screen = screen.clone();
        ctx.permissions.request(
            Capability::Camera,
            Box::new(move |decision| {
                match screen.apply(ScanEvent::PermissionResolved(decision)) {
                    ScanState::Armed => screen.arm(),
                    ScanState::PermissionDenied => screen.stack.set_visible_child_name("denied"),
                    _ => {}
                }
            }),
        );
    }

    {
        let screen = screen.clone();
        rx.attach(None, move |payload| {
            // A detection can race the pause through the channel; drop it.
            if !screen.state.borrow().armed() {
                return glib::ControlFlow::Continue;
            }
            screen.apply(ScanEvent::Detected(payload.clone()));
            screen.pause();
            handle_detection(&screen, &payload);
            glib::ControlFlow::Continue
        });
    }

    // Stop the camera when the screen is torn down.
    {
        let screen = screen.clone();
        stack.connect_unrealize(move |_| screen.pause());
    }

    stack.upcast()
}

fn handle_detection(screen: &Rc<ScanScreen>, payload: &str) {
    match contact::parse_payload(payload) {
        Ok(record) => {
            // The write runs in the background; the overlay shows regardless.
            let toasts = screen.ctx.toasts.clone();
            save_contact(&screen.ctx, record, move |outcome| {
                toasts.add_toast(adw::Toast::new(&outcome.notice()));
            });
        }
        Err(err) => {
            log::warn!("scanned code is not a contact: {err}");
            screen
                .ctx
                .toasts
                .add_toast(adw::Toast::new("Scanned code is not a contact card."));
        }
    }
    present_scanned_dialog(screen, payload);
}

fn present_scanned_dialog(screen: &Rc<ScanScreen>, payload: &str) {
    let dialog = gtk::Dialog::builder()
        .title("QR Code Scanned!")
        .transient_for(&screen.ctx.window)
        .modal(true)
        .build();

    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    content.set_margin_start(12);
    content.set_margin_end(12);
    let heading = gtk::Label::new(Some("QR Code Scanned!"));
    heading.add_css_class("title-2");
    let data = gtk::Label::new(Some(&format!("Scanned Data: {payload}")));
    data.set_wrap(true);
    content.append(&heading);
    content.append(&data);
    dialog.content_area().append(&content);

    let again = dialog.add_button("Scan Again", gtk::ResponseType::Ok);
    again.add_css_class("suggested-action");
    dialog.set_default_response(gtk::ResponseType::Ok);

    let screen = screen.clone();
    dialog.connect_response(move |dlg, response| {
        // Any way out of the dialog re-arms the scanner.
        if matches!(*screen.state.borrow(), ScanState::Scanned { .. }) {
            screen.apply(ScanEvent::ScanAgain);
            screen.arm();
        }
        if response != gtk::ResponseType::DeleteEvent {
            dlg.close();
        }
    });
    dialog.present();
}
