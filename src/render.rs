use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use norm_pacman::{Cell as MazeCell, CollectibleKind, Game, GameMode, GhostKind, Screen, Tile};

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Ghost,
    Frightened,
    Wall,
    Empty,
    Coin,
    Pellet,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: Glyph::Empty,
        color: Color::Reset,
    };

    fn new(glyph: Glyph, color: Color) -> Self {
        Self { glyph, color }
    }
}

/// Redraws only the board cells and HUD text that changed since the last
/// frame.
pub struct Renderer {
    width: usize,
    height: usize,
    last: Vec<Cell>,
    last_hud: String,
    last_screen: Option<Screen>,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            last: vec![Cell::BLANK; width * height],
            last_hud: String::new(),
            last_screen: None,
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    pub fn draw(&mut self, stdout: &mut Stdout, game: &Game) -> io::Result<()> {
        if self.last_screen != Some(game.screen()) {
            self.last_screen = Some(game.screen());
            self.needs_full = true;
            stdout.queue(Clear(ClearType::All))?;
        }

        // HUD above the board, footer below it.
        let needed_h = (self.height + 2) as u16;
        let needed_w = (self.width * CELL_W) as u16;
        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            stdout.queue(MoveTo(0, 0))?;
            stdout.queue(Clear(ClearType::All))?;
            stdout.queue(Print(format!(
                "Terminal too small. Need at least {needed_w}x{needed_h} (cols x rows). Current: {term_w}x{term_h}."
            )))?;
            stdout.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
            stdout.queue(Clear(ClearType::All))?;
        }

        match game.screen() {
            Screen::ScoreBoard => {
                if self.needs_full {
                    self.draw_scoreboard(stdout, game)?;
                }
            }
            Screen::Start | Screen::Playing | Screen::GameOver => {
                self.draw_hud(stdout, game)?;
                self.draw_board(stdout, game)?;
                if self.needs_full {
                    self.draw_footer(stdout, game)?;
                }
            }
        }
        self.needs_full = false;

        stdout.flush()
    }

    fn draw_hud(&mut self, stdout: &mut Stdout, game: &Game) -> io::Result<()> {
        let clock = game.mode_clock();
        let mode = match game.mode() {
            GameMode::Chase => "Chase".to_string(),
            GameMode::PowerUp => format!("Power-up {:.1}s", clock.power_up_remaining()),
            GameMode::Guard => format!("Guard {:.1}s", clock.guard_remaining()),
        };
        let hud = format!(
            "Score: {}  Level: {}  Coins: {}  Mode: {}",
            game.score(),
            game.level(),
            game.coins_remaining(),
            mode
        );
        if self.needs_full || hud != self.last_hud {
            stdout.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            stdout.queue(SetForegroundColor(Color::White))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(Print(&hud))?;
            stdout.queue(ResetColor)?;
            self.last_hud = hud;
        }
        Ok(())
    }

    fn draw_board(&mut self, stdout: &mut Stdout, game: &Game) -> io::Result<()> {
        let frame = self.compose(game);
        for (idx, cell) in frame.into_iter().enumerate() {
            if self.needs_full || cell != self.last[idx] {
                self.last[idx] = cell;
                self.draw_cell(stdout, idx % self.width, idx / self.width, cell)?;
            }
        }
        Ok(())
    }

    fn compose(&self, game: &Game) -> Vec<Cell> {
        let index = |tile: Tile| {
            let x = tile.x.rem_euclid(self.width as i32) as usize;
            let y = tile.y.rem_euclid(self.height as i32) as usize;
            y * self.width + x
        };

        let mut frame = vec![Cell::BLANK; self.width * self.height];
        for (tile, cell) in game.grid().tiles() {
            if cell == MazeCell::Wall {
                frame[index(tile)] = Cell::new(Glyph::Wall, Color::Blue);
            }
        }
        for item in game.collectibles().iter().filter(|c| !c.is_collected()) {
            frame[index(item.position().tile())] = match item.kind() {
                CollectibleKind::Coin => Cell::new(Glyph::Coin, Color::White),
                CollectibleKind::PowerPellet => Cell::new(Glyph::Pellet, Color::Magenta),
            };
        }
        let fleeing = game.mode() == GameMode::PowerUp;
        for ghost in game.ghosts() {
            frame[index(ghost.position().tile())] = if fleeing {
                Cell::new(Glyph::Frightened, Color::Blue)
            } else {
                Cell::new(Glyph::Ghost, ghost_color(ghost.kind()))
            };
        }
        frame[index(game.player().position().tile())] = Cell::new(Glyph::Player, Color::Yellow);
        frame
    }

    fn draw_cell(&self, stdout: &mut Stdout, x: usize, y: usize, cell: Cell) -> io::Result<()> {
        let text = match cell.glyph {
            Glyph::Player => "😃",
            Glyph::Ghost => "👻",
            Glyph::Frightened => "😱",
            Glyph::Wall => "██",
            Glyph::Empty => "  ",
            Glyph::Coin => "· ",
            Glyph::Pellet => "● ",
        };
        stdout.queue(MoveTo(
            self.origin_x + (x * CELL_W) as u16,
            self.origin_y + y as u16,
        ))?;
        stdout.queue(SetForegroundColor(cell.color))?;
        stdout.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        for _ in w..CELL_W {
            stdout.queue(Print(' '))?;
        }
        stdout.queue(ResetColor)?;
        Ok(())
    }

    fn draw_footer(&self, stdout: &mut Stdout, game: &Game) -> io::Result<()> {
        let text = match game.screen() {
            Screen::Start => "Press any key to start (q to quit)".to_string(),
            Screen::GameOver => format!(
                "GAME OVER - Final Score: {} (Enter to replay, s for scores, q to quit)",
                game.score()
            ),
            Screen::Playing | Screen::ScoreBoard => "arrows or hjkl to move, q to quit".to_string(),
        };
        stdout.queue(MoveTo(self.origin_x, self.origin_y + self.height as u16))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(text))?;
        Ok(())
    }

    fn draw_scoreboard(&self, stdout: &mut Stdout, game: &Game) -> io::Result<()> {
        let mut lines = vec!["HIGH SCORES".to_string(), String::new()];
        let scores = game.high_scores();
        if scores.is_empty() {
            lines.push("(no scores yet)".to_string());
        }
        for (rank, entry) in scores.entries().iter().enumerate() {
            lines.push(format!(
                "{:>2}. {:>7}  level {}",
                rank + 1,
                entry.score,
                entry.level
            ));
        }
        lines.push(String::new());
        lines.push("s to go back, Enter to replay, q to quit".to_string());

        for (row, line) in lines.iter().enumerate() {
            stdout.queue(MoveTo(self.origin_x, self.origin_y + row as u16))?;
            stdout.queue(SetForegroundColor(Color::White))?;
            stdout.queue(Print(line))?;
        }
        stdout.queue(ResetColor)?;
        Ok(())
    }
}

fn ghost_color(kind: GhostKind) -> Color {
    match kind {
        GhostKind::Manhattan => Color::Red,
        GhostKind::Euclidean => Color::Cyan,
        GhostKind::Max => Color::Green,
    }
}
