//! Path-separator canonicalization (§9 redesign guidance).
//!
//! Internally every path is represented with `/` regardless of host OS.
//! The on-disk format for `HEAD`, branch ref lines that embed paths, and
//! index entries uses `\` literally, matching the original layout. These
//! two functions are the only place that distinction should leak through.

pub fn to_disk(path: &str) -> String {
    path.replace('/', "\\")
}

pub fn from_disk(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let internal = "sub/b.txt";
        let disk = to_disk(internal);
        assert_eq!(disk, "sub\\b.txt");
        assert_eq!(from_disk(&disk), internal);
    }
}
