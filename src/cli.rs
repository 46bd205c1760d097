//! The `qsee` binary: argument parsing and the animation loop.
//!
//! The viewer splits the terminal into a left-hand text panel (file name,
//! title, molecule summary, parameters grouped by section) and a right-hand
//! kitty-protocol image region where the molecule spins at a fixed angular
//! speed. `--dump` bypasses the viewer entirely and prints the parsed store
//! as JSON.

use crate::error::Diagnostic;
use crate::kitty;
use crate::molecule::Molecule;
use crate::render::{Frame, Scene, ViewMode};
use crate::{parse_str, title, Deck, DeckMap};
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const IMAGE_SIZE: usize = 256;
/// One full rotation every six seconds.
const ROTATION_SPEED: f64 = std::f64::consts::PI / 3.0;
/// Panel width in columns; the image starts right of it.
const TEXT_COLUMNS: u16 = 42;

/// Command-line view-mode choice, mapped onto [`ViewMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ViewArg {
    #[default]
    Isometric,
    Xy,
    Xz,
    Yz,
}

impl From<ViewArg> for ViewMode {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Isometric => ViewMode::Isometric,
            ViewArg::Xy => ViewMode::Xy,
            ViewArg::Xz => ViewMode::Xz,
            ViewArg::Yz => ViewMode::Yz,
        }
    }
}

#[derive(Parser)]
#[command(name = "qsee")]
#[command(author, version, about = "Terminal viewer for quantum chemistry input decks")]
pub struct Cli {
    /// Input deck to view
    pub deck: PathBuf,

    /// Initial camera orientation
    #[arg(long, short = 'V', value_enum, default_value_t = ViewArg::Isometric)]
    pub view: ViewArg,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Print the parsed store and diagnostics as JSON, then exit
    #[arg(long)]
    pub dump: bool,
}

/// Entry point called by `main`.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let source = std::fs::read_to_string(&cli.deck)
        .with_context(|| format!("could not open {}", cli.deck.display()))?;
    let deck = parse_str(&source);

    for diagnostic in deck.diagnostics() {
        eprintln!("warning: {diagnostic}");
    }

    if cli.dump {
        return dump(&deck);
    }

    let molecule = Molecule::from_store(deck.store());
    if molecule.atoms.is_empty() {
        bail!("no atoms found in {}", cli.deck.display());
    }

    let info = PanelInfo::new(&cli.deck, title(&source), &molecule, deck.store());
    let scene = Scene::new(&molecule, IMAGE_SIZE, IMAGE_SIZE, cli.view.into());

    let mut stdout = io::stdout();
    setup_terminal(&mut stdout)?;
    let outcome = animate(&mut stdout, &scene, &info, cli.fps.max(1));
    restore_terminal(&mut stdout)?;
    outcome
}

fn dump(deck: &Deck) -> Result<()> {
    #[derive(serde::Serialize)]
    struct Dump<'a> {
        parameters: &'a DeckMap,
        diagnostics: &'a [Diagnostic],
    }
    let json = serde_json::to_string_pretty(&Dump {
        parameters: deck.store(),
        diagnostics: deck.diagnostics(),
    })?;
    println!("{json}");
    Ok(())
}

fn setup_terminal(out: &mut impl Write) -> Result<()> {
    execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
    terminal::enable_raw_mode()?;
    Ok(())
}

fn restore_terminal(out: &mut impl Write) -> Result<()> {
    let _ = kitty::clear_graphics(out);
    terminal::disable_raw_mode()?;
    execute!(out, Show, LeaveAlternateScreen)?;
    Ok(())
}

fn animate(out: &mut impl Write, scene: &Scene, info: &PanelInfo, fps: u32) -> Result<()> {
    let frame_budget = Duration::from_millis(u64::from(1000 / fps));
    let mut frame = Frame::new(IMAGE_SIZE, IMAGE_SIZE);
    let mut angle = 0.0f64;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        angle += ROTATION_SPEED * frame_start.duration_since(last).as_secs_f64();
        angle %= 2.0 * std::f64::consts::PI;
        last = frame_start;

        scene.render(&mut frame, angle);
        kitty::display_frame(out, &frame, TEXT_COLUMNS)?;
        draw_panel(out, info)?;

        // Sleep out the frame budget, but wake early for key events.
        let elapsed = frame_start.elapsed();
        let wait = frame_budget.saturating_sub(elapsed);
        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if should_exit(&key) {
                    return Ok(());
                }
            }
        }
    }
}

fn should_exit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Static text content of the left-hand panel, computed once before the loop.
struct PanelInfo {
    file_name: String,
    title: Option<String>,
    formula: String,
    atom_count: usize,
    charge: i64,
    multiplicity: i64,
    /// `(section, entries)` groups, preferred sections first.
    sections: Vec<(String, Vec<(String, String)>)>,
}

/// Sections shown before everything else, in this order.
const SECTION_ORDER: [&str; 5] = ["QM", "BASIS", "SCF", "MISC", "INTS"];

impl PanelInfo {
    fn new(path: &std::path::Path, title: Option<String>, molecule: &Molecule, store: &DeckMap) -> Self {
        let mut groups: Vec<(String, Vec<(String, String)>)> = Vec::new();
        for (key, value) in store.iter() {
            // The geometry blob would drown the panel; molecule facts are
            // summarized above the parameter list already.
            if key == "MOLECULE.GEOM" || key == "GEOMETRY" {
                continue;
            }
            let (section, field) = match key.split_once('.') {
                Some((section, field)) => (section, field),
                None => ("GLOBAL", key),
            };
            if section == "MOLECULE" {
                continue;
            }
            // Multi-line values would wreck the fixed-row layout.
            let value = value.replace('\n', " ");
            match groups.iter_mut().find(|(name, _)| name == section) {
                Some((_, entries)) => entries.push((field.to_string(), value)),
                None => groups.push((section.to_string(), vec![(field.to_string(), value)])),
            }
        }

        groups.sort_by_key(|(name, _)| {
            SECTION_ORDER
                .iter()
                .position(|s| s == name)
                .unwrap_or(SECTION_ORDER.len())
        });

        PanelInfo {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            title,
            formula: molecule.formula(),
            atom_count: molecule.atoms.len(),
            charge: molecule.charge,
            multiplicity: molecule.multiplicity,
            sections: groups,
        }
    }
}

/// One styled panel row: clear it, print, advance the row counter.
fn panel_line<W: Write>(
    out: &mut W,
    row: &mut u16,
    color: Option<Color>,
    bold: bool,
    text: &str,
) -> Result<()> {
    queue!(out, MoveTo(0, *row), Clear(ClearType::UntilNewLine))?;
    if bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if let Some(color) = color {
        queue!(out, SetForegroundColor(color))?;
    }
    queue!(out, Print(text), ResetColor, SetAttribute(Attribute::Reset))?;
    *row += 1;
    Ok(())
}

fn draw_panel<W: Write>(out: &mut W, info: &PanelInfo) -> Result<()> {
    let text_width = usize::from(TEXT_COLUMNS).saturating_sub(4).max(30);
    let rule = "━".repeat(text_width);
    let mut row: u16 = 0;

    panel_line(out, &mut row, Some(Color::Cyan), true, &rule)?;
    panel_line(out, &mut row, Some(Color::White), true, &format!(" {}", info.file_name))?;
    if let Some(title) = &info.title {
        panel_line(out, &mut row, Some(Color::DarkGrey), false, &format!("   {title}"))?;
    }
    panel_line(out, &mut row, Some(Color::Cyan), true, &rule)?;
    row += 1;

    panel_line(out, &mut row, Some(Color::Yellow), true, " MOLECULE")?;
    panel_line(out, &mut row, None, false, &format!("    Formula:      {}", info.formula))?;
    panel_line(out, &mut row, None, false, &format!("    Atoms:        {}", info.atom_count))?;
    let sign = if info.charge >= 0 { "+" } else { "" };
    panel_line(out, &mut row, None, false, &format!("    Charge:       {sign}{}", info.charge))?;
    panel_line(out, &mut row, None, false, &format!("    Multiplicity: {}", info.multiplicity))?;
    row += 1;

    panel_line(out, &mut row, Some(Color::White), true, " INPUT PARAMETERS")?;
    panel_line(out, &mut row, Some(Color::Cyan), true, &rule)?;

    for (section, entries) in &info.sections {
        let color = if SECTION_ORDER.contains(&section.as_str()) {
            Color::Green
        } else {
            Color::Magenta
        };
        panel_line(out, &mut row, Some(color), true, &format!("  {section}"))?;
        for (field, value) in entries {
            let text: String = format!("     {field}: {value}")
                .chars()
                .take(text_width)
                .collect();
            panel_line(out, &mut row, Some(Color::Cyan), false, &text)?;
        }
        row += 1;
    }

    panel_line(out, &mut row, Some(Color::DarkGrey), false, " Press q to exit")?;
    out.flush()?;
    Ok(())
}
