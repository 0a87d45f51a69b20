use dipkit_image::ImageError;

/// A binary probe with an explicit origin.
///
/// The origin need not be the geometric centre and need not be a 1-cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuringElement {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
    origin_x: usize,
    origin_y: usize,
}

impl StructuringElement {
    /// Create a structuring element from its rows and origin.
    ///
    /// # Arguments
    ///
    /// * `rows` - The shape mask, one inner vector per row, values 0 or 1.
    /// * `origin_x` - Column of the origin.
    /// * `origin_y` - Row of the origin.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidArgument`] if the matrix is empty or ragged, holds values
    /// other than 0 and 1, or if the origin lies outside it.
    pub fn new(rows: Vec<Vec<u8>>, origin_x: usize, origin_y: usize) -> Result<Self, ImageError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if n_rows == 0 || n_cols == 0 {
            return Err(ImageError::InvalidArgument(
                "structuring element must not be empty".to_string(),
            ));
        }
        if rows.iter().any(|r| r.len() != n_cols) {
            return Err(ImageError::InvalidArgument(
                "structuring element rows must have equal length".to_string(),
            ));
        }
        let data: Vec<u8> = rows.into_iter().flatten().collect();
        if let Some(v) = data.iter().find(|&&v| v > 1) {
            return Err(ImageError::InvalidArgument(format!(
                "structuring element cells must be 0 or 1, found {v}"
            )));
        }
        if origin_x >= n_cols || origin_y >= n_rows {
            return Err(ImageError::InvalidArgument(format!(
                "origin ({origin_x}, {origin_y}) outside a {n_cols}x{n_rows} structuring element"
            )));
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
            origin_x,
            origin_y,
        })
    }

    /// A `side x side` cross centred on its origin.
    pub fn cross(side: usize) -> Result<Self, ImageError> {
        let c = side / 2;
        let rows = (0..side)
            .map(|r| (0..side).map(|col| (r == c || col == c) as u8).collect())
            .collect();
        Self::new(rows, c, c)
    }

    /// A filled `side x side` square centred on its origin.
    pub fn square(side: usize) -> Result<Self, ImageError> {
        let c = side / 2;
        Self::new(vec![vec![1; side]; side], c, c)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The origin as `(x, y)`.
    pub fn origin(&self) -> (usize, usize) {
        (self.origin_x, self.origin_y)
    }

    /// Whether the cell at column `x`, row `y` is set.
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.data[y * self.cols + x] == 1
    }

    /// Offsets `(dx, dy)` of every 1-cell relative to the origin.
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        let (ox, oy) = (self.origin_x as isize, self.origin_y as isize);
        (0..self.rows)
            .flat_map(|y| (0..self.cols).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_set(x, y))
            .map(|(x, y)| (x as isize - ox, y as isize - oy))
            .collect()
    }
}

/// A 3x3 thinning template; `-1` cells match either value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThinningTemplate(pub [[i8; 3]; 3]);

impl ThinningTemplate {
    /// Whether the 3x3 neighbourhood `cells` (row-major, centre at `[1][1]`) matches.
    #[inline]
    pub fn matches(&self, cells: &[[u8; 3]; 3]) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(cells.iter().flatten())
            .all(|(&t, &v)| t < 0 || t as u8 == v)
    }
}

const fn t(cells: [[i8; 3]; 3]) -> ThinningTemplate {
    ThinningTemplate(cells)
}

/// Four-direction edge peeling: the orthogonal templates of [`THINNING_XII`].
pub const THINNING_XI: [ThinningTemplate; 4] = [
    t([[0, 0, 0], [-1, 1, -1], [1, 1, 1]]),
    t([[1, -1, 0], [1, 1, 0], [1, -1, 0]]),
    t([[1, 1, 1], [-1, 1, -1], [0, 0, 0]]),
    t([[0, -1, 1], [0, 1, 1], [0, -1, 1]]),
];

/// The classic eight-template thinning series, rotating clockwise from north.
pub const THINNING_XII: [ThinningTemplate; 8] = [
    t([[0, 0, 0], [-1, 1, -1], [1, 1, 1]]),
    t([[-1, 0, 0], [1, 1, 0], [-1, 1, -1]]),
    t([[1, -1, 0], [1, 1, 0], [1, -1, 0]]),
    t([[-1, 1, -1], [1, 1, 0], [-1, 0, 0]]),
    t([[1, 1, 1], [-1, 1, -1], [0, 0, 0]]),
    t([[-1, 1, -1], [0, 1, 1], [0, 0, -1]]),
    t([[0, -1, 1], [0, 1, 1], [0, -1, 1]]),
    t([[0, 0, -1], [0, 1, 1], [-1, 1, -1]]),
];

/// Look up a thinning series by name (`xi` or `xii`, case-insensitive).
///
/// # Errors
///
/// Returns [`ImageError::UnknownResource`] for any other name.
pub fn thinning_series(name: &str) -> Result<&'static [ThinningTemplate], ImageError> {
    match name.to_ascii_lowercase().as_str() {
        "xi" => Ok(&THINNING_XI),
        "xii" => Ok(&THINNING_XII),
        _ => Err(ImageError::UnknownResource(format!(
            "thinning series '{name}'"
        ))),
    }
}
