use std::rc::Rc;

use gtk4::prelude::*;
use gtk4 as gtk;

use crate::nav::Screen;

/// Landing screen: two buttons that push the scanner or the generator.
pub fn build(on_navigate: Rc<dyn Fn(Screen)>) -> gtk::Widget {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_valign(gtk::Align::Center);
    root.set_halign(gtk::Align::Center);

    let scan_btn = gtk::Button::with_label("Scan QR Code");
    scan_btn.add_css_class("suggested-action");
    let create_btn = gtk::Button::with_label("Create QR Code");

    {
        let on_navigate = on_navigate.clone();
        scan_btn.connect_clicked(move |_| on_navigate(Screen::Scan));
    }
    create_btn.connect_clicked(move |_| on_navigate(Screen::Create));

    root.append(&scan_btn);
    root.append(&create_btn);
    root.upcast()
}
