//! Readable grouping of digest glyphs

/// Glyphs per group for a digest of `len` glyphs
pub fn group_width(len: usize) -> usize {
    if len % 3 == 0 && len / 3 <= 4 {
        3
    } else {
        4
    }
}

/// Insert `separator` between groups.
///
/// Groups are [`group_width`] glyphs wide. The leftover glyphs that do not fill
/// a whole group are absorbed by the group at index `group_count / 2`, so the
/// odd-sized group sits in the middle of the digest.
pub fn group_glyphs(glyphs: &[char], separator: char) -> String {
    let len = glyphs.len();
    let width = group_width(len);
    let groups = len / width;
    let leftover = (len - groups * width) as isize;
    let middle = groups / 2;

    let mut out = String::with_capacity(len + groups);
    let mut count: isize = 0;
    let mut group_index = 0;
    for (i, &glyph) in glyphs.iter().enumerate() {
        out.push(glyph);
        count += 1;

        if count == width as isize && i < len - 1 {
            out.push(separator);
            group_index += 1;
            count = 0;

            if group_index == middle {
                count = -leftover;
            }
        }
    }
    out
}
