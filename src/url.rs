use anyhow::{Context, Result};
use maplit::hashmap;
use std::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};
use strfmt::strfmt;

use crate::tile::Tile;

const OSM_SERVERS: &[&str] = &["a", "b", "c"];

/// A tile URL template with the replacement specifiers `{x}`, `{y}`, `{z}`
/// and optionally `{s}`, which rotates through the `a`, `b` and `c`
/// subdomains. `${x}`-style specifiers are accepted as well.
pub struct UrlFormat {
    inc: AtomicUsize,
    format_str: String,
}

impl UrlFormat {
    pub fn from_str(format_str: &str) -> Self {
        Self {
            inc: AtomicUsize::new(0),
            format_str: format_str.replace("${", "{"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.format_str
    }

    pub fn tile_url(&self, tile: &Tile) -> Result<String> {
        let inc = self.inc.fetch_add(1, Ordering::Relaxed);
        let vars = hashmap! {
            "s".to_owned() => OSM_SERVERS[inc % OSM_SERVERS.len()].to_owned(),
            "x".to_owned() => tile.x.to_string(),
            "y".to_owned() => tile.y.to_string(),
            "z".to_owned() => tile.z.to_string(),
        };

        strfmt(&self.format_str, &vars).context("failed formatting URL")
    }
}

impl PartialEq for UrlFormat {
    fn eq(&self, other: &Self) -> bool {
        self.format_str == other.format_str
    }
}

impl fmt::Debug for UrlFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlFormat")
            .field("format_str", &self.format_str)
            .finish()
    }
}
