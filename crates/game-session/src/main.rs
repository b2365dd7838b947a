//! chess-parlor: play the mock engine in a terminal.
//!
//! Reads commands from stdin while the engine thinks. Engine analysis runs as
//! a spawned task; when the controller issues a new ticket or drops the
//! pending one, the old task is aborted.

use chess_core::Square;
use game_session::command::{parse_command, Command, HELP};
use game_session::view::{
    move_list, render_board, render_metrics, render_move_list, status_line, SessionSnapshot,
};
use game_session::{
    performance_metrics, AnalysisTicket, ClickResult, EngineReply, GameController, GameSettings,
    PlayerSide, SoundBoard,
};
use mock_engine::{EngineAnalysis, EngineConfig, EngineError, MockEngine};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{info, warn};

type Controller = GameController;
type Outcome = Result<Option<EngineAnalysis>, EngineError>;

struct EngineTask {
    ticket: AnalysisTicket,
    handle: JoinHandle<Outcome>,
}

enum Event {
    Input(Option<String>),
    Engine(AnalysisTicket, Outcome),
}

enum Flow {
    Continue,
    Quit,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut settings = GameSettings::from_env()?;
    settings.apply_args(&args)?;

    let engine = MockEngine::new(EngineConfig::load());
    let sound = SoundBoard::init(settings.sound_enabled, &settings.sound_dir);
    let mut controller: Controller = GameController::new(settings, engine, sound);
    let mut task: Option<EngineTask> = None;

    println!("chess-parlor (type 'help' for commands)");
    controller.start();
    print_board(&controller);
    sync_engine_task(&controller, &mut task);
    print_status(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let event = tokio::select! {
            line = lines.next_line() => Event::Input(line?),
            (ticket, outcome) = engine_reply(&mut task) => Event::Engine(ticket, outcome),
        };

        match event {
            Event::Input(None) => break,
            Event::Input(Some(line)) => match parse_command(&line) {
                Ok(None) => continue,
                Ok(Some(command)) => {
                    if let Flow::Quit = handle_command(&mut controller, command) {
                        break;
                    }
                }
                Err(e) => println!("{e}"),
            },
            Event::Engine(ticket, outcome) => {
                handle_engine_reply(&mut controller, &ticket, outcome);
            }
        }

        sync_engine_task(&controller, &mut task);
    }

    if let Some(task) = task.take() {
        task.handle.abort();
    }
    info!("Goodbye");
    Ok(())
}

/// Resolves when the running analysis finishes; never resolves when idle.
async fn engine_reply(task: &mut Option<EngineTask>) -> (AnalysisTicket, Outcome) {
    let Some(running) = task.as_mut() else {
        return std::future::pending().await;
    };

    let joined = (&mut running.handle).await;
    let ticket = running.ticket.clone();
    *task = None;

    let outcome = joined.unwrap_or_else(|e| Err(EngineError::Interrupted(e.to_string())));
    (ticket, outcome)
}

/// Keep the spawned task in step with the controller's pending ticket.
fn sync_engine_task(controller: &Controller, task: &mut Option<EngineTask>) {
    let wanted = controller.pending();
    if task.as_ref().map(|t| &t.ticket) == wanted {
        return;
    }

    if let Some(old) = task.take() {
        old.handle.abort();
    }
    if let Some(ticket) = wanted {
        let handle = tokio::spawn(controller.analysis_future(ticket));
        *task = Some(EngineTask {
            ticket: ticket.clone(),
            handle,
        });
    }
}

fn handle_command(controller: &mut Controller, command: Command) -> Flow {
    match command {
        Command::Move { from, to } => match controller.play(from, to) {
            Ok(turn) => {
                println!("You played {}", turn.record.notation);
                print_board(controller);
            }
            Err(e) => println!("{e}"),
        },
        Command::Notation(text) => match controller.play_notation(&text) {
            Ok(turn) => {
                println!("You played {}", turn.record.notation);
                print_board(controller);
            }
            Err(e) => println!("{e}"),
        },
        Command::Select(square) => handle_click(controller, square),
        Command::Go => match controller.request_engine_move() {
            Ok(_) => {}
            Err(e) => println!("{e}"),
        },
        Command::Moves => {
            println!("{}", render_move_list(&move_list(controller.session())));
        }
        Command::Goto(plies) => match controller.jump_to(Command::goto_index(plies)) {
            Ok(_) => print_board(controller),
            Err(e) => println!("{e}"),
        },
        Command::Live => match controller.jump_to_latest() {
            Ok(_) => print_board(controller),
            Err(e) => println!("{e}"),
        },
        Command::Board => print_board(controller),
        Command::Status => {
            let status = controller.session().status();
            println!("{}", status.position);
            if let Some(reason) = status.draw_reason {
                println!("Draw by {reason:?}");
            }
        }
        Command::Metrics => {
            let session = controller.session();
            let metrics = performance_metrics(session.moves());
            let active = !session.moves().is_empty() && !session.phase().is_terminal();
            println!("{}", render_metrics(&metrics, active));
        }
        Command::Json => match serde_json::to_string_pretty(&SessionSnapshot::capture(controller)) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!(error = %e, "Failed to serialize session"),
        },
        Command::New => {
            controller.new_game();
            print_board(controller);
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => return Flow::Quit,
    }

    print_status(controller);
    Flow::Continue
}

fn handle_click(controller: &mut Controller, square: Square) {
    match controller.click(square) {
        Ok(ClickResult::Ignored) => println!("Nothing to select on {square}"),
        Ok(ClickResult::Selected(_)) | Ok(ClickResult::Cleared) => print_board(controller),
        Ok(ClickResult::Played(turn)) => {
            println!("You played {}", turn.record.notation);
            print_board(controller);
        }
        Err(e) => println!("{e}"),
    }
}

fn handle_engine_reply(controller: &mut Controller, ticket: &AnalysisTicket, outcome: Outcome) {
    match controller.resolve(ticket, outcome) {
        EngineReply::Applied { record, analysis, .. } => {
            println!(
                "Engine played {} (eval {:+.1}, depth {})",
                record.notation, analysis.evaluation, analysis.depth
            );
            print_board(controller);
        }
        EngineReply::NoMove => println!("Engine has no legal move"),
        EngineReply::Failed(e) => println!("Engine error: {e}"),
        EngineReply::Stale | EngineReply::Discarded(_) => {}
    }
    print_status(controller);
}

fn print_board(controller: &Controller) {
    let flipped = controller.settings().side == PlayerSide::Black;
    let input = controller.input();
    let targets = input.highlights(controller.session());
    println!(
        "{}",
        render_board(controller.session(), flipped, input.selected(), &targets)
    );
}

fn print_status(controller: &Controller) {
    let session = controller.session();
    let mut line = status_line(&session.status(), controller.is_thinking());
    if !session.is_at_latest() {
        line.push_str(&format!(
            " (viewing move {} of {}, 'live' to return)",
            session.cursor_index() + 1,
            session.moves().len()
        ));
    }
    println!("{line}");
}
