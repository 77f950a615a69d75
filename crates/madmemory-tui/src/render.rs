use crate::app::App;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use madmemory_core::{Indicator, Tone, BUTTON_COUNT};
use std::io;

/// Panel width: four 7-wide buttons with 2-wide gaps, plus the frame
const PANEL_WIDTH: u16 = 4 * 7 + 3 * 2 + 4;
const PANEL_HEIGHT: u16 = 13;

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide)?;
    execute!(stdout, SetBackgroundColor(app.theme.bg), Clear(ClearType::All))?;

    let x = term_width.saturating_sub(PANEL_WIDTH) / 2;
    let y = if term_height > PANEL_HEIGHT + 8 { 2 } else { 1 };

    render_frame(stdout, app, x, y)?;
    render_display(stdout, app, x, y + 1)?;
    render_indicators(stdout, app, x, y + 5)?;
    render_buttons(stdout, app, x, y + 6)?;
    render_status(stdout, app, x, y + 10)?;
    render_controls(stdout, app, x, y + PANEL_HEIGHT + 1)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_frame(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let inner = "-".repeat(PANEL_WIDTH as usize - 2);
    let blank = " ".repeat(PANEL_WIDTH as usize - 2);

    execute!(
        stdout,
        SetForegroundColor(theme.border),
        MoveTo(x, y),
        Print(format!("+{}+", inner))
    )?;
    for row in 1..PANEL_HEIGHT - 1 {
        execute!(stdout, MoveTo(x, y + row), Print(format!("|{}|", blank)))?;
    }
    execute!(
        stdout,
        MoveTo(x, y + PANEL_HEIGHT - 1),
        Print(format!("+{}+", inner))
    )?;

    let title = format!(" MAD MEMORY #{} ", app.session.module_id());
    let title_x = x + (PANEL_WIDTH.saturating_sub(title.len() as u16)) / 2;
    execute!(
        stdout,
        MoveTo(title_x, y),
        SetForegroundColor(theme.key),
        Print(title)
    )?;
    Ok(())
}

fn render_display(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let width = 16usize;
    let screen_x = x + (PANEL_WIDTH - width as u16 - 2) / 2;
    let text = app.session.display_text().unwrap_or("");

    execute!(
        stdout,
        SetForegroundColor(theme.border),
        MoveTo(screen_x, y),
        Print(format!("+{}+", "=".repeat(width))),
        MoveTo(screen_x, y + 1),
        Print("|"),
        SetForegroundColor(theme.display),
        Print(format!("{:^width$}", text, width = width)),
        SetForegroundColor(theme.border),
        Print("|"),
        MoveTo(screen_x, y + 2),
        Print(format!("+{}+", "=".repeat(width)))
    )?;
    Ok(())
}

/// Color of the light above a button, taking any running pulse into account
fn indicator_color(app: &App, position: usize) -> Color {
    let theme = &app.theme;
    if let Some(pulse) = &app.pulse {
        return match pulse.lit_tone() {
            Some(Tone::Red) => theme.pulse_red,
            Some(Tone::Green) => theme.pulse_green,
            None => theme.led_off,
        };
    }
    match app.session.indicator(position) {
        Indicator::Off => theme.led_off,
        Indicator::Selected => theme.led_selected,
        Indicator::Cleared => theme.led_cleared,
    }
}

fn button_x(x: u16, position: usize) -> u16 {
    x + 2 + position as u16 * 9
}

fn render_indicators(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    for position in 0..BUTTON_COUNT {
        execute!(
            stdout,
            MoveTo(button_x(x, position) + 3, y),
            SetForegroundColor(indicator_color(app, position)),
            Print("●")
        )?;
    }
    Ok(())
}

fn render_buttons(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let labels = app.session.labels();
    let selection = app.session.selection().unwrap_or_default();

    for position in 0..BUTTON_COUNT {
        let bx = button_x(x, position);
        let face = if selection.get(position) {
            theme.button_selected_bg
        } else {
            theme.button_bg
        };
        let label = labels
            .map(|l| l.get(position).to_string())
            .unwrap_or_else(|| " ".to_string());

        execute!(stdout, SetBackgroundColor(face), SetForegroundColor(theme.fg))?;
        execute!(stdout, MoveTo(bx, y), Print("       "))?;
        execute!(stdout, MoveTo(bx, y + 1), Print(format!("   {}   ", label)))?;
        execute!(stdout, MoveTo(bx, y + 2), Print("       "))?;
    }
    execute!(stdout, SetBackgroundColor(theme.bg))?;
    Ok(())
}

fn render_status(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    execute!(
        stdout,
        MoveTo(x + 2, y),
        SetForegroundColor(theme.info),
        Print(format!("{:<16}", app.phase_text())),
        MoveTo(x + PANEL_WIDTH - 14, y),
        Print(format!("Strikes: {:>3}", app.session.strikes()))
    )?;
    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let controls = [
        ("a", "Activate"),
        ("1-4", "Press button"),
        ("Enter/s", "Submit"),
        ("r", "New module"),
        ("q/Esc", "Quit"),
    ];

    for (i, (key, desc)) in controls.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x, y + i as u16),
            SetForegroundColor(theme.key),
            Print(format!("{:>8}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }
    Ok(())
}

fn render_message(stdout: &mut io::Stdout, app: &App, msg: &str, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.len() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.button_selected_bg),
        Print(&padded),
        SetBackgroundColor(theme.bg)
    )?;
    Ok(())
}
