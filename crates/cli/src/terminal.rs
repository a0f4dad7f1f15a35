// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Terminal I/O.
use anyhow::Result;
use crossterm::{
    cursor,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{self, Stylize},
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use log::error;
use std::io;

use hitstand_cards::{Card, Hand, Suit, Value};
use hitstand_core::{Action, HandKind, HttpClient, Session};

/// The last consult outcome shown under the hands.
#[derive(Debug)]
enum Outcome {
    /// Nothing to show.
    None,
    /// A request is in flight.
    Consulting,
    /// The recommended action.
    Advice(Action),
    /// A consult or storage error.
    Error(String),
}

/// Terminal view state that is not part of the session.
struct View {
    outcome: Outcome,
    /// The value picked before the suit.
    pending_value: Option<Value>,
}

/// Runs the terminal loop.
pub async fn run(mut session: Session, client: HttpClient) -> Result<()> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;

    let res = event_loop(&mut stdout, &mut session, &client).await;

    execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        cursor::Show
    )?;
    disable_raw_mode()?;

    res
}

async fn event_loop(
    stdout: &mut io::Stdout,
    session: &mut Session,
    client: &HttpClient,
) -> Result<()> {
    let mut view = View {
        outcome: Outcome::None,
        pending_value: None,
    };

    print_screen(stdout, session, &view)?;

    let mut reader = EventStream::new();
    while let Some(event) = reader.next().await {
        let key = match event? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            Event::Resize(..) => {
                print_screen(stdout, session, &view)?;
                continue;
            }
            _ => continue,
        };

        if is_quit(&key, session.selected().is_some()) {
            break;
        }

        if session.selected().is_some() {
            handle_picker_key(key, session, &mut view);
        } else {
            match key.code {
                KeyCode::Char('p') => session.select_hand(HandKind::Player),
                KeyCode::Char('d') => session.select_hand(HandKind::Dealer),
                KeyCode::Char('m') => session.toggle_mode(),
                KeyCode::Char('x') => {
                    view.outcome = match session.clear() {
                        Ok(()) => Outcome::None,
                        Err(e) => Outcome::Error(e.to_string()),
                    };
                }
                KeyCode::Char('c') | KeyCode::Enter => {
                    view.outcome = Outcome::Consulting;
                    print_screen(stdout, session, &view)?;

                    view.outcome = match session.consult(client).await {
                        Ok(advice) => Outcome::Advice(Action::parse(&advice)),
                        Err(e) => {
                            if !e.is_local() {
                                error!("Consult error: {e}");
                            }
                            Outcome::Error(e.to_string())
                        }
                    };
                }
                _ => {}
            }
        }

        print_screen(stdout, session, &view)?;
    }

    Ok(())
}

/// Ctrl+C always quits, `q` only when the picker is closed as it is the queen
/// key in the picker.
fn is_quit(key: &KeyEvent, picker_open: bool) -> bool {
    let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
    ctrl_c || (key.code == KeyCode::Char('q') && !picker_open)
}

/// Handles a key while the card picker is open.
fn handle_picker_key(key: KeyEvent, session: &mut Session, view: &mut View) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return;
    }

    let c = match key.code {
        KeyCode::Esc => {
            view.pending_value = None;
            session.cancel_selection();
            return;
        }
        KeyCode::Char(c) => c,
        _ => return,
    };

    if let Some(value) = view.pending_value {
        if let Some(suit) = Suit::from_char(c) {
            view.pending_value = None;
            if let Err(e) = session.pick(Card::new(value, suit)) {
                view.outcome = Outcome::Error(e.to_string());
            }
            return;
        }
    }

    if let Some(value) = Value::from_char(c) {
        view.pending_value = Some(value);
    }
}

fn print_screen(w: &mut impl io::Write, session: &Session, view: &View) -> Result<()> {
    execute!(w, Clear(ClearType::All))?;

    let header = format!(
        "HITSTAND  mode: {:<8} [p]layer [d]ealer [m]ode [c]onsult [x]clear [q]uit",
        session.mode().label()
    );
    queue!(
        w,
        cursor::MoveTo(0, 0),
        style::PrintStyledContent(header.as_str().dark_green())
    )?;

    print_hand(w, session, HandKind::Player, 2)?;
    print_hand(w, session, HandKind::Dealer, 3)?;

    if let Some(kind) = session.selected() {
        let value = view
            .pending_value
            .map(|v| format!("{v}, suit [c d h s]"))
            .unwrap_or_else(|| "value [a 2-9 t j q k]".to_string());
        let text = format!("Pick {kind} card: {value}  Esc cancel");
        queue!(
            w,
            cursor::MoveTo(0, 5),
            style::PrintStyledContent(text.as_str().yellow())
        )?;
    }

    queue!(w, cursor::MoveTo(0, 7))?;
    match &view.outcome {
        Outcome::None => {}
        Outcome::Consulting => {
            queue!(w, style::Print("Consulting strategy..."))?;
        }
        Outcome::Advice(action) => {
            let text = format!("Recommended action: {action}");
            queue!(w, style::PrintStyledContent(text.as_str().bold().green()))?;
        }
        Outcome::Error(e) => {
            queue!(w, style::PrintStyledContent(e.as_str().red()))?;
        }
    }

    w.flush()?;

    Ok(())
}

fn print_hand(w: &mut impl io::Write, session: &Session, kind: HandKind, row: u16) -> Result<()> {
    let hand = session.hands().get(kind);

    queue!(
        w,
        cursor::MoveTo(0, row),
        style::Print(format!("{:<8}", hand_label(kind)))
    )?;

    for card in hand.cards() {
        let text = format!("{:>4}", card.to_string());
        if card.suit().is_red() {
            queue!(w, style::PrintStyledContent(text.as_str().red()))?;
        } else {
            queue!(w, style::Print(text))?;
        }
    }

    queue!(
        w,
        cursor::MoveTo(48, row),
        style::Print(format!("{:>10}", total_label(hand)))
    )?;

    Ok(())
}

/// Prints the hands and totals as plain text.
pub fn print_hands(w: &mut impl io::Write, session: &Session) -> Result<()> {
    for kind in [HandKind::Player, HandKind::Dealer] {
        let hand = session.hands().get(kind);
        writeln!(w, "{:<8}{:<40}{:>10}", hand_label(kind), hand.to_string(), total_label(hand))?;
    }

    Ok(())
}

fn hand_label(kind: HandKind) -> &'static str {
    match kind {
        HandKind::Player => "Player",
        HandKind::Dealer => "Dealer",
    }
}

fn total_label(hand: &Hand) -> String {
    if hand.is_empty() {
        String::new()
    } else if hand.is_blackjack() {
        "BLACKJACK".to_string()
    } else if hand.is_bust() {
        format!("{} BUST", hand.total().points)
    } else {
        hand.total().to_string()
    }
}
