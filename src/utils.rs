use glib::MainContext;
use once_cell::sync::Lazy;

pub static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime")
});

pub fn spawn_async<F>(fut: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    RUNTIME.spawn(fut);
}

pub fn glib_channel<T: Send + 'static>() -> (glib::Sender<T>, glib::Receiver<T>) {
    MainContext::channel(glib::Priority::default())
}

/// Runs a future on the worker runtime and hands its result back to the GTK
/// main context through a channel.
pub fn run_async_to_main<T, E, Fut>(fut: Fut) -> glib::Receiver<Result<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
    Fut: std::future::Future<Output = Result<T, E>> + Send + 'static,
{
    let (tx, rx) = glib_channel::<Result<T, E>>();
    spawn_async(async move {
        let res = fut.await;
        let _ = tx.send(res);
    });
    rx
}

/// Splits a helper command line into program and arguments. Quoting is not
/// supported; the settings file keeps these simple.
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_command_separates_program_and_args() {
        let parts = split_command("zbarcam --raw /dev/video2");
        assert_eq!(parts, vec!["zbarcam", "--raw", "/dev/video2"]);
    }

    #[test]
    fn split_command_collapses_whitespace() {
        let parts = split_command("  zbarcam   --raw ");
        assert_eq!(parts, vec!["zbarcam", "--raw"]);
    }

    #[test]
    fn split_command_of_blank_is_empty() {
        assert!(split_command("   ").is_empty());
    }
}
