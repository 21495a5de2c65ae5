mod config;
mod error;
mod input;
mod quiz;
mod store;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use rand::rngs::StdRng;
use rand::SeedableRng;
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

use config::QuizConfig;
use input::{ClickState, InputEvent};
use quiz::QuizGame;
use store::{KeyValueStore, MemoryStore};
use time::TickClock;

/// Grid container rect, to turn page coordinates into grid-relative pixels.
fn grid_rect() -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    Some(grid.get_bounding_client_rect())
}

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
fn open_store() -> Rc<dyn KeyValueStore> {
    match store::LocalStorage::open() {
        Some(storage) => Rc::new(storage),
        None => {
            log::warn!("localStorage unavailable; progress will not survive a reload");
            Rc::new(MemoryStore::new())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn open_store() -> Rc<dyn KeyValueStore> {
    log::warn!("no browser storage on this target; progress is kept in memory");
    Rc::new(MemoryStore::new())
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        log::warn!("console logger not installed: {e}");
    }
    log::info!("math quiz starting");

    let store = open_store();
    let config = QuizConfig::load(store.as_ref());
    let ticks_per_second = config.ticks_per_second;
    let game = Rc::new(RefCell::new(QuizGame::new(
        config,
        store,
        StdRng::from_entropy(),
    )));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }
            let Some(rect) = grid_rect() else {
                return;
            };

            let action = click_state.borrow().hit_test_pixels(
                mouse_event.x as f64 - rect.left(),
                mouse_event.y as f64 - rect.top(),
                rect.width(),
                rect.height(),
            );
            if let Some(action_id) = action {
                log::debug!("click: action {action_id}");
                game.borrow_mut()
                    .handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            let event = match key_event.code {
                KeyCode::Char(c) => InputEvent::Key(c),
                KeyCode::Esc => InputEvent::Back,
                KeyCode::Backspace => InputEvent::Erase,
                KeyCode::Enter => InputEvent::Submit,
                KeyCode::Tab => InputEvent::NextField,
                _ => return,
            };
            game.borrow_mut().handle_input(&event);
        }
    });

    let clock = RefCell::new(TickClock::new(ticks_per_second));
    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let ticks = clock.borrow_mut().advance_to(performance_now());
            let mut game = game.borrow_mut();
            if ticks > 0 {
                game.tick(ticks);
            }

            let size = f.area();
            click_state.borrow_mut().reset(size.width, size.height);
            game.render(f, size, &click_state);
        }
    });

    Ok(())
}
