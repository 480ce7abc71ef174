use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use adw::prelude::*;
use adw::Application;
use directories::BaseDirs;
use gtk4 as gtk;
use serde::{Deserialize, Serialize};

use crate::nav::{Navigator, Screen};
use crate::platform::camera::{CameraFeed, ZbarCamera};
use crate::platform::contacts::{ContactStore, SqliteContactStore};
use crate::platform::permissions::{PermissionBroker, PromptBroker};
use crate::ui;

const DEFAULT_SCANNER: &str = "zbarcam --raw --nodisplay";

/// On-disk app settings, TOML in the user config dir.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Override for the barcode helper, e.g. "zbarcam --raw /dev/video2".
    pub scanner_command: Option<String>,
}

impl Settings {
    fn path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("qr-contacts.toml"))
    }

    pub fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(text) = fs::read_to_string(&path) {
                match toml::from_str::<Settings>(&text) {
                    Ok(settings) => return settings,
                    Err(err) => log::warn!("ignoring malformed settings: {err}"),
                }
            }
        }
        Self::default()
    }

    pub fn scanner(&self) -> &str {
        self.scanner_command.as_deref().unwrap_or(DEFAULT_SCANNER)
    }
}

/// Injectable platform services shared by every screen.
pub struct AppContext {
    pub window: gtk::Window,
    pub toasts: adw::ToastOverlay,
    pub permissions: Rc<dyn PermissionBroker>,
    pub camera: Rc<dyn CameraFeed>,
    pub contacts: Arc<dyn ContactStore>,
}

struct Shell {
    ctx: Rc<AppContext>,
    nav: RefCell<Navigator>,
    slot: adw::Bin,
    title: gtk::Label,
    back_btn: gtk::Button,
}

impl Shell {
    /// Builds a fresh widget for the current screen. Screens are remounted
    /// on every transition, which is what re-prompts for permissions.
    fn mount(shell: &Rc<Shell>) {
        let screen = shell.nav.borrow().current();
        shell.title.set_label(screen.title());
        shell.back_btn.set_visible(shell.nav.borrow().can_go_back());
        let widget = match screen {
            Screen::Home => {
                let shell = shell.clone();
                ui::home::build(Rc::new(move |target| Shell::navigate(&shell, target)))
            }
            Screen::Scan => ui::scan::build(shell.ctx.clone()),
            Screen::Create => {
                let shell = shell.clone();
                ui::create::build(shell.ctx.clone(), Rc::new(move || Shell::go_back(&shell)))
            }
        };
        shell.slot.set_child(Some(&widget));
    }

    fn navigate(shell: &Rc<Shell>, screen: Screen) {
        shell.nav.borrow_mut().navigate(screen);
        Shell::mount(shell);
    }

    fn go_back(shell: &Rc<Shell>) {
        if shell.nav.borrow_mut().go_back() {
            Shell::mount(shell);
        }
    }
}

pub fn build_ui(app: &Application) {
    let settings = Settings::load();

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("QR Contacts")
        .default_width(420)
        .default_height(640)
        .build();

    let header = adw::HeaderBar::new();
    let title = gtk::Label::new(Some(Screen::Home.title()));
    header.set_title_widget(Some(&title));
    let back_btn = gtk::Button::from_icon_name("go-previous-symbolic");
    back_btn.set_visible(false);
    header.pack_start(&back_btn);

    let slot = adw::Bin::new();
    slot.set_vexpand(true);
    let toasts = adw::ToastOverlay::new();
    toasts.set_child(Some(&slot));

    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    container.append(&header);
    container.append(&toasts);
    window.set_content(Some(&container));

    let store = match SqliteContactStore::open_default() {
        Ok(store) => store,
        Err(err) => {
            log::warn!("no data directory, keeping contacts beside the binary: {err}");
            SqliteContactStore::open_at("contacts.sqlite")
        }
    };
    if let Err(err) = store.init() {
        log::error!("failed to prepare the address book: {err}");
    }

    let camera = ZbarCamera::from_command(settings.scanner()).unwrap_or_else(|err| {
        log::warn!("bad scanner_command in settings ({err}), using the default");
        ZbarCamera::from_command(DEFAULT_SCANNER).expect("default scanner command is valid")
    });

    let ctx = Rc::new(AppContext {
        window: window.clone().upcast(),
        toasts,
        permissions: Rc::new(PromptBroker::new(&window)),
        camera: Rc::new(camera),
        contacts: Arc::new(store),
    });

    let shell = Rc::new(Shell {
        ctx,
        nav: RefCell::new(Navigator::new()),
        slot,
        title,
        back_btn: back_btn.clone(),
    });

    {
        let shell = shell.clone();
        back_btn.connect_clicked(move |_| Shell::go_back(&shell));
    }

    Shell::mount(&shell);
    window.present();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_defaults_when_unset() {
        assert_eq!(Settings::default().scanner(), DEFAULT_SCANNER);
    }

    #[test]
    fn scanner_override_wins() {
        let settings: Settings =
            toml::from_str("scanner_command = \"zbarcam --raw /dev/video2\"").unwrap();
        assert_eq!(settings.scanner(), "zbarcam --raw /dev/video2");
    }

    #[test]
    fn empty_settings_parse_to_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert!(settings.scanner_command.is_none());
    }
}
