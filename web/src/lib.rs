use clap::Parser;
use wasm_bindgen::prelude::*;

mod games;
mod schedule;
mod settings;
mod shell;
mod strings;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = match Args::try_parse_from(location_hash.split(['#', '&'])) {
        Ok(args) => args,
        Err(err) => {
            gloo::console::warn!(format!("Ignoring location hash: {}", err));
            Args::parse_from([""])
        }
    };
    if let Some(log_level) = args.verbose.log_level() {
        if let Err(err) = console_log::init_with_level(log_level) {
            gloo::console::error!(format!("Error initializing logger: {}", err));
        }
    }
    log::debug!("seed: {:?}", args.seed);

    let Some(root) = document().get_element_by_id("retrodesk") else {
        log::error!("Could not find id=\"retrodesk\" element");
        return;
    };

    log::debug!("App started");
    yew::Renderer::<shell::App>::with_root_and_props(root, shell::AppProps { seed: args.seed })
        .render();
}
