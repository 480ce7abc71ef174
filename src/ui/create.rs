use std::rc::Rc;

use adw::prelude::*;
use gtk4 as gtk;

use crate::app::AppContext;
use crate::contact::{self, ContactRecord};
use crate::ui::qr;
use crate::ui::save_contact::save_contact;

/// Entry form with a live QR preview. The code renders only while both
/// fields are non-empty, and Save Contact is clickable only then. A saved
/// contact pops back to the previous screen; a denial or failure leaves the
/// form intact.
pub fn build(ctx: Rc<AppContext>, on_saved: Rc<dyn Fn()>) -> gtk::Widget {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_margin_start(24);
    root.set_margin_end(24);

    let name_label = gtk::Label::new(Some("Enter Name:"));
    name_label.set_halign(gtk::Align::Start);
    let name_entry = gtk::Entry::new();
    name_entry.set_hexpand(true);

    let phone_label = gtk::Label::new(Some("Enter Phone Number:"));
    phone_label.set_halign(gtk::Align::Start);
    let phone_entry = gtk::Entry::new();
    phone_entry.set_hexpand(true);
    // Hint only; any text is accepted.
    phone_entry.set_input_purpose(gtk::InputPurpose::Phone);

    let picture = gtk::Picture::new();
    picture.set_size_request(qr::QR_SIZE as i32, qr::QR_SIZE as i32);
    picture.set_halign(gtk::Align::Center);
    picture.set_visible(false);

    let save_btn = gtk::Button::with_label("Save Contact");
    save_btn.add_css_class("suggested-action");
    save_btn.set_halign(gtk::Align::Center);
    save_btn.set_sensitive(false);

    root.append(&name_label);
    root.append(&name_entry);
    root.append(&phone_label);
    root.append(&phone_entry);
    root.append(&picture);
    root.append(&save_btn);

    let refresh: Rc<dyn Fn()> = {
        let name_entry = name_entry.clone();
        let phone_entry = phone_entry.clone();
        let picture = picture.clone();
        let save_btn = save_btn.clone();
        Rc::new(move || {
            let name = name_entry.text().to_string();
            let phone = phone_entry.text().to_string();
            let ready = !name.is_empty() && !phone.is_empty();
            save_btn.set_sensitive(ready);
            if !ready {
                picture.set_visible(false);
                return;
            }
            let payload = contact::encode_payload(&ContactRecord {
                name,
                phone_number: phone,
            });
            match qr::render(&payload) {
                Ok(image) => {
                    picture.set_paintable(Some(&qr::texture(&image)));
                    picture.set_visible(true);
                }
                Err(err) => {
                    log::warn!("could not render QR code: {err}");
                    picture.set_visible(false);
                }
            }
        })
    };
    {
        let refresh = refresh.clone();
        name_entry.connect_changed(move |_| (refresh)());
    }
    {
        let refresh = refresh.clone();
        phone_entry.connect_changed(move |_| (refresh)());
    }

    {
        let ctx = ctx.clone();
        let name_entry = name_entry.clone();
        let phone_entry = phone_entry.clone();
        save_btn.connect_clicked(move |_| {
            let record = ContactRecord {
                name: name_entry.text().to_string(),
                phone_number: phone_entry.text().to_string(),
            };
            if record.name.is_empty() || record.phone_number.is_empty() {
                return;
            }
            let toasts = ctx.toasts.clone();
            let on_saved = on_saved.clone();
            save_contact(&ctx, record, move |outcome| {
                toasts.add_toast(adw::Toast::new(&outcome.notice()));
                if outcome.is_saved() {
                    on_saved();
                }
            });
        });
    }

    root.upcast()
}
