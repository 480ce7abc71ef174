mod app;
mod contact;
mod nav;
mod platform;
mod scan;
mod ui;
mod utils;

use adw::prelude::*;
use adw::Application;

fn main() {
    env_logger::init();
    let app = Application::builder()
        .application_id("com.example.QrContactsGtk")
        .build();
    app.connect_activate(|app| {
        crate::app::build_ui(app);
    });
    app.run();
}
