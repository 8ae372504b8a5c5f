extern crate nogo_mcts;

use clap::Parser;
use flexi_logger::Logger;
use nogo_mcts::agent::Player;
use nogo_mcts::board::{Action, Board, Placement, Stone};
use nogo_mcts::boards::nogo::NoGoBoard;
use std::error::Error;

/// Plays one game of NoGo between two configured agents.
#[derive(Parser, Debug)]
#[command(name = "selfplay")]
struct Args {
    /// Arguments of the black player
    #[arg(long, default_value = "name=mcts role=black N=300 c=0.2 psi=-1 threads=2 seed=7")]
    black: String,

    /// Arguments of the white player
    #[arg(long, default_value = "weak role=white seed=11")]
    white: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let _logger = Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let args = Args::parse();
    let mut black: Player = Player::new(&args.black)?;
    let mut white: Player = Player::new(&args.white)?;

    // Play one game, printing each move
    let mut board = NoGoBoard::default();
    let loser = loop {
        let player = match board.mover() {
            Stone::Black => &mut black,
            Stone::White => &mut white,
        };
        match player.take_action(&board)? {
            Action::Place(mv) => {
                if board.place(mv.cell) != Placement::Legal {
                    return Err(format!("{} played an illegal move: {}", player.name(), mv).into());
                }
                println!("{:>3}. {} ({})", board.stone_count(), mv, player.name());
            }
            Action::Pass => break board.mover(),
        }
    };

    println!("{}", board);
    let winner = if loser == black.role() { &white } else { &black };
    println!(
        "{} has no legal move, {} ({}) wins",
        loser,
        winner.name(),
        loser.opponent()
    );
    Ok(())
}
