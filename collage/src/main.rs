#![warn(clippy::pedantic)]

mod host;
mod preferences;

use collage_core::{bitmap::Bitmap, commands::Dispatcher, state::Canvas};

#[cfg(all(feature = "jemallocator", not(target_env = "msvc")))]
#[global_allocator]
static ALLOC: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use anyhow::Result as AnyResult;

/// Decode every path, in parallel. Failures are logged and skipped, order is kept.
fn load_photos(paths: Vec<std::path::PathBuf>) -> Vec<Bitmap> {
    use rayon::iter::{IntoParallelIterator, ParallelIterator};
    paths
        .into_par_iter()
        .filter_map(|path| match Bitmap::open(&path) {
            Ok(bitmap) => Some(bitmap),
            Err(e) => {
                log::error!("failed to open photo {path:?}: {e}");
                None
            }
        })
        .collect()
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let preferences = preferences::Preferences::load();
    if let Err(e) = preferences.save() {
        log::warn!("Failed to save preferences:\n{e:?}");
    };
    let mut host = host::Host::new(Dispatcher::new(Canvas::new(
        preferences.canvas_settings(),
    )));

    // Args are a simple list of photos to place at startup.
    let paths: Vec<std::path::PathBuf> = std::env::args_os().skip(1).map(Into::into).collect();
    if !paths.is_empty() {
        let requested = paths.len();
        let photos = load_photos(paths);
        if photos.is_empty() {
            log::warn!("Failed to load any of {requested} provided photos.");
        }
        println!(
            "{}",
            host.send(collage_core::commands::Event::AddObjects(photos))?
        );
    }

    for line in std::io::stdin().lines() {
        let line = line?;
        let parsed = match host::parse(&line) {
            Ok(parsed) => parsed,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        // Desync between host and canvas is fatal, bubble it.
        match host.handle(parsed, load_photos)? {
            Some(reply) if reply.is_empty() => (),
            Some(reply) => println!("{reply}"),
            None => break,
        }
    }

    Ok(())
}
