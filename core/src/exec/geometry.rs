use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    /// Marker for a point that is not attached to anything; reads from and
    /// writes to an empty line in point lists.
    pub const DETACHED: Point = Point {
        x: i16::MIN,
        y: i16::MIN,
    };

    pub const fn new(x: i16, y: i16) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn is_detached(&self) -> bool {
        *self == Point::DETACHED
    }

    pub fn parse(text: &str) -> Option<Self> {
        let [x, y] = parse_components::<2>(text)?;
        Some(Point {
            x: to_i16(x)?,
            y: to_i16(y)?,
        })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Color { red, green, blue }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let [r, g, b] = parse_components::<3>(text)?;
        Some(Color {
            red: to_u8(r)?,
            green: to_u8(g)?,
            blue: to_u8(b)?,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.red, self.green, self.blue)
    }
}

/// Axis-aligned rectangle. Rendered as `left,top,right,bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl Rectangle {
    pub const fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Rectangle { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x as i32 + self.width as i32
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y as i32 + self.height as i32
    }

    /// Parse `left,top,right,bottom`. A right or bottom edge before the
    /// opposite edge yields a zero extent.
    pub fn parse(text: &str) -> Option<Self> {
        let [left, top, right, bottom] = parse_components::<4>(text)?;
        let x = to_i16(left)?;
        let y = to_i16(top)?;
        Some(Rectangle {
            x,
            y,
            width: extent(left, right)?,
            height: extent(top, bottom)?,
        })
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.right(), self.bottom())
    }
}

fn parse_components<const N: usize>(text: &str) -> Option<[i64; N]> {
    let mut out = [0i64; N];
    let mut parts = text.split(',');
    for slot in out.iter_mut() {
        let part = parts.next()?.trim();
        *slot = parse_integral(part)?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

// Components accept any number that rounds to an integer ("10", "10.0", "9.6").
fn parse_integral(text: &str) -> Option<i64> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(i);
    }
    let real = crate::val::parse_number(text, false)?;
    Some(real.round() as i64)
}

fn to_i16(value: i64) -> Option<i16> {
    i16::try_from(value).ok()
}

fn to_u8(value: i64) -> Option<u8> {
    u8::try_from(value).ok()
}

// Edges must fit in i32; a reversed pair yields zero.
fn extent(start: i64, end: i64) -> Option<u16> {
    let end = i32::try_from(end).ok()?;
    let span = i64::from(end).checked_sub(start)?;
    u16::try_from(span.max(0)).ok()
}
