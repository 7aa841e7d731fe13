use ratatui::style::Color;
use ratatui::symbols::border;

/// Side length of the square play field, in logical cells.
///
/// The board is always `side × side`; positions are valid in `[0, side)`
/// on both axes.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    side: u16,
}

impl GridSize {
    /// Creates a grid of `side × side` cells, never smaller than
    /// [`MIN_GRID_SIZE`].
    #[must_use]
    pub fn new(side: u16) -> Self {
        Self {
            side: side.max(MIN_GRID_SIZE),
        }
    }

    /// Derives the grid from a canvas edge and a cell edge, both in the same
    /// unit: `floor(canvas_size / cell_size)`.
    #[must_use]
    pub fn from_canvas(canvas_size: u16, cell_size: u16) -> Self {
        Self::new(canvas_size / cell_size.max(1))
    }

    /// Derives the grid for a terminal of `cols × rows` characters.
    ///
    /// One logical cell is `cell_size` rows tall and `2 * cell_size` columns
    /// wide so cells stay roughly square on screen.
    #[must_use]
    pub fn for_viewport(cols: u16, rows: u16, cell_size: u16) -> Self {
        Self::from_canvas(canvas_size_for_viewport(cols, rows), cell_size)
    }

    /// Cells per side.
    #[must_use]
    pub fn side(self) -> u16 {
        self.side
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.side) * usize::from(self.side)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

/// Usable canvas edge (in terminal rows) for a terminal of `cols × rows`.
#[must_use]
pub fn canvas_size_for_viewport(cols: u16, rows: u16) -> u16 {
    let by_width = (cols / 2).saturating_sub(BORDER_CELLS);
    let by_height = rows.saturating_sub(HUD_ROWS + BORDER_CELLS);
    by_width.min(by_height).min(MAX_CANVAS_SIZE)
}

/// Colors used by the terminal renderer.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_label: Color,
    pub hud_value: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

/// Green snake, red food on a dark field.
pub const THEME: Theme = Theme {
    snake_head: Color::Rgb(0x4C, 0xAF, 0x50),
    snake_body: Color::Rgb(0x38, 0x8E, 0x3C),
    food: Color::Rgb(0xFF, 0x52, 0x52),
    play_bg: Color::Black,
    border_fg: Color::DarkGray,
    hud_label: Color::DarkGray,
    hud_value: Color::White,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

/// Two-column glyph for a snake segment.
pub const GLYPH_SNAKE: &str = "██";

/// One-column glyph for food; the second column of its cell stays blank.
pub const GLYPH_FOOD: &str = "●";

/// Score granted per food eaten.
pub const FOOD_POINTS: u32 = 10;

/// Random samples tried before falling back to enumerating free cells.
pub const FOOD_SAMPLE_ATTEMPTS: usize = 64;

/// Smallest board that still fits the starting snake with room to move.
pub const MIN_GRID_SIZE: u16 = 8;

/// Board used before the terminal size is known.
pub const DEFAULT_GRID_SIZE: u16 = 20;

/// Largest canvas edge, in terminal rows.
pub const MAX_CANVAS_SIZE: u16 = 30;

/// Border thickness around the play field, in cells.
pub const BORDER_CELLS: u16 = 2;

/// Rows reserved below the play field for the HUD.
pub const HUD_ROWS: u16 = 2;

/// Input poll timeout for one frame of the host loop.
pub const FRAME_POLL_MS: u64 = 16;

/// Valid range for the `--cell-size` option.
pub const MAX_CELL_SIZE: u16 = 3;
