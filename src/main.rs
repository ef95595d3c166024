//! Terminal front end to a RotaChess session.
//!
//! Reads one command per line and redraws the board after each one.
//! Log output goes to stderr and is controlled by `RUST_LOG`.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::info;
use tracing_subscriber::EnvFilter;

use rotachess_core::coretypes::{Move, Square};
use rotachess_core::history::MoveEntry;
use rotachess_core::selection::Highlight;
use rotachess_core::{
    GameStatus, Notification, Rotating, RotationEvent, RulesOracle, SessionController,
    StandardRules,
};

const TICK: Duration = Duration::from_millis(25);

enum InputKind {
    Exit,
    Help,
    Undo,
    Redo,
    Reset,
    Flip,
    Rotate,
    Moves,
    Click(Square),
    Drop(Move),
    Error,
}

impl From<&str> for InputKind {
    fn from(s: &str) -> Self {
        if let Ok(square) = s.parse::<Square>() {
            return Self::Click(square);
        }
        if let Ok(move_) = s.parse::<Move>() {
            return Self::Drop(move_);
        }
        match s {
            "exit" | "quit" => Self::Exit,
            "help" => Self::Help,
            "undo" | "u" => Self::Undo,
            "redo" | "r" => Self::Redo,
            "reset" | "ng" => Self::Reset,
            "flip" => Self::Flip,
            "rotate" => Self::Rotate,
            "moves" => Self::Moves,
            _ => Self::Error,
        }
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    println!("RotaChess 0.1.0\n");

    let mut board = Rotating::new(SessionController::new(StandardRules::new()));
    info!(config = ?board.config(), "session started");
    let inbox: Rc<RefCell<Vec<Notification>>> = Rc::new(RefCell::new(Vec::new()));
    {
        let inbox = Rc::clone(&inbox);
        board.subscribe(move |notification| inbox.borrow_mut().push(notification.clone()));
    }

    let mut input = String::new();
    loop {
        print_board(board.session());
        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        match InputKind::from(input.trim()) {
            InputKind::Exit => break,
            InputKind::Help => {
                print_help();
                continue;
            }
            InputKind::Undo => board.on_undo(),
            InputKind::Redo => board.on_redo(),
            InputKind::Reset => board.on_reset(),
            InputKind::Flip => board.flip_orientation(),
            InputKind::Rotate => rotate(&mut board),
            InputKind::Moves => {
                print_moves(board.session());
                continue;
            }
            InputKind::Click(square) => board.on_square_click(square),
            InputKind::Drop(move_) => {
                board.apply_move(move_);
            }
            InputKind::Error => {
                println!("Invalid command: {}", input.trim().escape_debug());
                continue;
            }
        }

        for notification in inbox.borrow_mut().drain(..) {
            print_notification(&notification);
        }
    }
    Ok(())
}

/// Run a rotation to completion, reporting its milestones.
fn rotate<O: RulesOracle>(board: &mut Rotating<O>) {
    if !board.rotate(Instant::now()) {
        println!("Board is already rotating.");
        return;
    }
    while board.is_transitioning() {
        thread::sleep(TICK);
        for event in board.tick(Instant::now()) {
            match event {
                RotationEvent::OrientationFlipped(orientation) => {
                    println!("Board turned: {} at the bottom.", orientation.bottom().name());
                }
                RotationEvent::TransitionFinished => println!("Rotation finished."),
            }
        }
    }
}

fn print_board<O: RulesOracle>(board: &SessionController<O>) {
    let position = board.current_position();
    let styles = board.square_styles();
    let orientation = board.orientation();

    for rank in orientation.ranks_top_down() {
        let mut row = format!("{} ", rank);
        for file in orientation.files_left_right() {
            let square = Square::new(file, rank);
            let piece = board.oracle().piece_at(position, square);
            let cell = match (styles.get(&square), piece) {
                (Some(Highlight::Selected), Some(piece)) => format!("*{}", piece),
                (Some(Highlight::LegalDestination), Some(piece)) => format!("x{}", piece),
                (Some(Highlight::LegalDestination), None) => " .".to_string(),
                (_, Some(piece)) => format!(" {}", piece),
                (_, None) => " -".to_string(),
            };
            row.push_str(&cell);
        }
        println!("{}", row);
    }
    let files: String = orientation
        .files_left_right()
        .map(|file| format!(" {}", file))
        .collect();
    println!("  {}", files);

    match board.game_status() {
        GameStatus::Ongoing => println!("{} to move.", board.side_to_move().name()),
        status => println!("{}", status),
    }
    print_moves(board);
}

fn print_moves<O: RulesOracle>(board: &SessionController<O>) {
    let pairs = board.move_pairs();
    if pairs.is_empty() {
        return;
    }
    let mut line = String::new();
    for pair in pairs {
        match pair.white {
            Some(white) => line.push_str(&format!("{}. {} ", pair.number, entry_text(white))),
            None => line.push_str(&format!("{}... ", pair.number)),
        }
        if let Some(black) = pair.black {
            line.push_str(&format!("{} ", entry_text(black)));
        }
    }
    println!("{}", line.trim_end());
}

/// The displayed move is bracketed.
fn entry_text(entry: MoveEntry) -> String {
    if entry.active {
        format!("[{}]", entry.notation)
    } else {
        entry.notation.to_string()
    }
}

fn print_notification(notification: &Notification) {
    match notification {
        Notification::StateChanged => {}
        Notification::MoveRejected { move_, reason } => {
            println!("Move {} rejected: {}.", move_, reason);
        }
        Notification::GameOver(status) => println!("Game over: {}.", status),
    }
}

fn print_help() {
    println!("Commands:");
    println!("<square>  => Click a square, e.g. e2. Select a piece, then click a destination.");
    println!("<move>    => Drag and drop a piece, e.g. e2e4, or e7e8n to underpromote.");
    println!("undo | u  => Step back one move.");
    println!("redo | r  => Step forward along the recorded line.");
    println!("reset | ng => Start a new game.");
    println!("flip      => Turn the board around.");
    println!("rotate    => Turn the board around slowly.");
    println!("moves     => Print the move list.");
    println!("help      => Print this help text.");
    println!("exit      => End the session.");
}
