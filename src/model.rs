//! Data structures shared by the catalog client and the report renderer.
//!
//! Catalog records are plain values: they are produced once per request from the upstream
//! payload and never mutated afterwards.  The geometry types describe where clickable regions
//! land on a rendered page, in PDF user space (points, origin at the bottom-left corner).

/// A single movie record as returned by the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogItem {
    id: String,
    title: String,
    release_date: String,
    rating: f64,
    poster_path: Option<String>,
}

impl CatalogItem {
    /// Creates an item without a poster.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        release_date: impl Into<String>,
        rating: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            release_date: release_date.into(),
            rating,
            poster_path: None,
        }
    }

    /// Opaque identifier of the item in the catalog.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn release_date(&self) -> &str {
        &self.release_date
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Relative path of the poster image, if the catalog has one.
    pub fn poster_path(&self) -> Option<&str> {
        self.poster_path.as_deref()
    }

    /// Sets the poster path and returns the updated item.
    pub fn with_poster_path(mut self, poster_path: impl Into<Option<String>>) -> Self {
        self.poster_path = poster_path.into();
        self
    }
}

/// Ordered collection of catalog items, kept in the order the catalog returned them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogListing {
    items: Vec<CatalogItem>,
}

impl CatalogListing {
    pub fn new(items: impl Into<Vec<CatalogItem>>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogItem> {
        self.items.iter()
    }
}

impl FromIterator<CatalogItem> for CatalogListing {
    fn from_iter<I: IntoIterator<Item = CatalogItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a CatalogListing {
    type Item = &'a CatalogItem;
    type IntoIter = std::slice::Iter<'a, CatalogItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for CatalogListing {
    type Item = CatalogItem;
    type IntoIter = std::vec::IntoIter<CatalogItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Axis-aligned rectangle in PDF user space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl Rect {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Returns the corners as the `[x_min y_min x_max y_max]` array used by PDF dictionaries.
    pub fn to_array(&self) -> [f32; 4] {
        [self.x_min, self.y_min, self.x_max, self.y_max]
    }
}

/// A clickable region on a page bound to a target URI.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkRegion {
    rect: Rect,
    uri: String,
}

impl LinkRegion {
    pub fn new(rect: Rect, uri: impl Into<String>) -> Self {
        Self {
            rect,
            uri: uri.into(),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}
