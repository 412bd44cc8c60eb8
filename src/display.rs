//! Plain-text rendering of a game.
//!
//! Works from a `GameView`, so it shows exactly what a presentation layer
//! would: face-down cards as `XX`, the stock as a count.

use std::time::Duration;

use crate::clock::format_elapsed;
use crate::tableau::NUM_COLS;
use crate::view::{CardView, GameView};

/// `AS`, `10H`, or `XX` for a face-down card.
pub fn format_card_visible(card: &CardView) -> String {
    if card.face_up {
        card.card.short_str()
    } else {
        "XX".to_string()
    }
}

/// Foundation tops in suit order, e.g. `[AS] [  ] [3D] [  ]`.
pub fn render_foundations(view: &GameView) -> String {
    let tops: Vec<String> = view
        .foundations
        .iter()
        .map(|f| match f.cards.last() {
            Some(top) => format!("[{:>3}]", format_card_visible(top)),
            None => format!("[ {} ]", f.suit.short_char()),
        })
        .collect();
    format!("Foundations: {}", tops.join(" "))
}

pub fn render_stock_and_waste(view: &GameView) -> String {
    let stock = match view.stock_count {
        0 => "Stock: [empty]".to_string(),
        n => format!("Stock: [{n} cards]"),
    };
    let waste = match view.waste.last() {
        None => "Waste: [empty]".to_string(),
        Some(top) => format!(
            "Waste: [{}] ({} cards)",
            format_card_visible(top),
            view.waste.len()
        ),
    };
    format!("{stock}    {waste}")
}

/// Columns side by side, bottom card on the first row.
pub fn render_columns(view: &GameView) -> String {
    let mut s = String::from("      ");
    for col in 1..=NUM_COLS {
        s.push_str(&format!(" C{col} "));
    }
    s.push('\n');

    let height = view.columns.iter().map(Vec::len).max().unwrap_or(0);
    for row in 0..height {
        s.push_str("      ");
        for col in &view.columns {
            match col.get(row) {
                Some(card) => s.push_str(&format!("{:>3} ", format_card_visible(card))),
                None => s.push_str("    "),
            }
        }
        s.push('\n');
    }
    s
}

pub fn render_status(view: &GameView) -> String {
    let mut s = format!(
        "Deal: {}    Moves: {}    Time: {}",
        view.deal,
        view.move_count,
        format_elapsed(Duration::from_secs(view.elapsed_secs))
    );
    if view.won {
        s.push_str("    ** WON **");
    }
    s
}

/// Full board: status, foundations, stock and waste, columns.
pub fn render_game(view: &GameView) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        render_status(view),
        render_foundations(view),
        render_stock_and_waste(view),
        render_columns(view)
    )
}
