//! Single-entry memo of the last compiled style sheet.

use log::trace;

use crate::media::MediaContext;
use crate::style::StyleSheet;

/// Cache key: viewport size and device pixel ratio.
///
/// Keys compare bit-for-bit, so `0.0` and `-0.0` are different keys and a
/// NaN key equals itself.
#[derive(Debug, Clone, Copy)]
pub struct CacheKey {
    width: u32,
    height: u32,
    dp_ratio: u32,
}

impl CacheKey {
    pub fn new(context: &MediaContext) -> Self {
        Self {
            width: context.viewport.width.to_bits(),
            height: context.viewport.height.to_bits(),
            dp_ratio: context.dp_ratio.to_bits(),
        }
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.dp_ratio == other.dp_ratio
    }
}

impl Eq for CacheKey {}

#[derive(Debug, Clone)]
struct CacheEntry {
    key: CacheKey,
    style_sheet: StyleSheet,
}

/// Holds at most one compiled sheet together with the key it was built for.
#[derive(Debug, Clone, Default)]
pub struct CompileCache {
    entry: Option<CacheEntry>,
    compile_count: u64,
}

impl CompileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached sheet for `key`, compiling and storing a new one on a
    /// miss. The previous entry is dropped before `compile` runs.
    pub fn get_or_compile<F>(&mut self, key: CacheKey, compile: F) -> &StyleSheet
    where
        F: FnOnce() -> StyleSheet,
    {
        let entry = match self.entry.take() {
            Some(entry) if entry.key == key => {
                trace!("compiled style sheet cache hit");
                entry
            }
            _ => {
                self.compile_count += 1;
                CacheEntry {
                    key,
                    style_sheet: compile(),
                }
            }
        };
        &self.entry.insert(entry).style_sheet
    }

    /// The cached sheet, if it was compiled for `key`.
    pub fn get(&self, key: CacheKey) -> Option<&StyleSheet> {
        self.entry
            .as_ref()
            .filter(|entry| entry.key == key)
            .map(|entry| &entry.style_sheet)
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    /// Number of cache misses that triggered a compile.
    pub fn compile_count(&self) -> u64 {
        self.compile_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ViewportSize;

    fn key(width: f32, height: f32, dp_ratio: f32) -> CacheKey {
        CacheKey::new(&MediaContext::new(ViewportSize::new(width, height), dp_ratio))
    }

    #[test]
    fn test_hit_returns_same_sheet() {
        let mut cache = CompileCache::new();
        let first = cache.get_or_compile(key(800.0, 600.0, 1.0), StyleSheet::new) as *const StyleSheet;
        let second = cache.get_or_compile(key(800.0, 600.0, 1.0), || {
            panic!("cache hit must not compile")
        }) as *const StyleSheet;
        assert_eq!(first, second);
        assert_eq!(cache.compile_count(), 1);
    }

    #[test]
    fn test_any_key_change_recompiles() {
        let mut cache = CompileCache::new();
        cache.get_or_compile(key(800.0, 600.0, 1.0), StyleSheet::new);
        cache.get_or_compile(key(801.0, 600.0, 1.0), StyleSheet::new);
        cache.get_or_compile(key(801.0, 601.0, 1.0), StyleSheet::new);
        cache.get_or_compile(key(801.0, 601.0, 1.5), StyleSheet::new);
        assert_eq!(cache.compile_count(), 4);
        assert!(cache.get(key(801.0, 601.0, 1.5)).is_some());
        assert!(cache.get(key(800.0, 600.0, 1.0)).is_none());
    }

    #[test]
    fn test_keys_compare_bitwise() {
        assert_eq!(key(f32::NAN, 1.0, 1.0), key(f32::NAN, 1.0, 1.0));
        assert_ne!(key(0.0, 1.0, 1.0), key(-0.0, 1.0, 1.0));
        assert_ne!(key(1.0, 1.0, 1.0), key(1.0, 1.0, 1.0 + f32::EPSILON));
    }

    #[test]
    fn test_clear() {
        let mut cache = CompileCache::new();
        cache.get_or_compile(key(1.0, 1.0, 1.0), StyleSheet::new);
        cache.clear();
        assert!(cache.is_empty());
        cache.get_or_compile(key(1.0, 1.0, 1.0), StyleSheet::new);
        assert_eq!(cache.compile_count(), 2);
    }
}
