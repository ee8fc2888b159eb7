use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use campus_core::{update, AppState, Msg};
use campus_engine::EngineHandle;
use campus_logging::campus_info;
use chrono::Local;

use super::config;
use super::effects::EffectRunner;
use super::ui::console::{self, ConsoleFrontend};
use super::ui::{render, Frontend};

/// Single-owner app loop: all state mutation happens here, driven by the
/// message channel that the input, tick and engine pump threads feed.
pub fn run_app() -> anyhow::Result<()> {
    let credentials = console::prompt_credentials()?;
    let config = config::portal_config();
    campus_info!("starting crawl against {}", config.base_url);

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();

    let mut engine = EngineHandle::start(config.clone(), credentials);
    let events = engine
        .take_event_receiver()
        .context("engine event receiver already taken")?;
    let runner = EffectRunner::new(engine, events, msg_tx.clone());

    spawn_ticker(msg_tx.clone(), Msg::Tick, config::DIRTY_POLL_INTERVAL);
    spawn_ticker(
        msg_tx.clone(),
        Msg::RemainingTick,
        config::REMAINING_REFRESH_INTERVAL,
    );
    console::spawn_input_thread(msg_tx);

    let mut state = AppState::with_look_ahead(config.look_ahead_days);
    let mut frontend = ConsoleFrontend::new();

    loop {
        let msg = msg_rx.recv().context("message channel closed")?;
        let remaining_refresh = matches!(msg, Msg::RemainingTick);

        let (next, effects) = update(state, msg);
        state = next;
        let shutdown = runner.apply(effects);

        if state.consume_dirty() {
            frontend.apply(render::render(&state.view(Local::now().naive_local())));
        } else if remaining_refresh {
            frontend.apply(render::render_remaining(
                &state.view(Local::now().naive_local()),
            ));
        }

        if shutdown {
            break;
        }
    }

    // Idempotent; the crawl thread also releases on exit.
    runner.release_session();
    campus_info!("app loop finished");
    Ok(())
}

fn spawn_ticker(msg_tx: mpsc::Sender<Msg>, msg: Msg, interval: Duration) {
    thread::spawn(move || {
        while msg_tx.send(msg.clone()).is_ok() {
            thread::sleep(interval);
        }
    });
}
