//! Image-group tagging over a built document.
//!
//! Consecutive image paragraphs render as one tight stack. The last paragraph of every run keeps
//! the normal paragraph spacing after it, so the run reads as a single figure.
use crate::document::Block;
use crate::document::BlockKind;
use std::ops::Range;

/// Tags the last image paragraph of every maximal run of adjacent image paragraphs.
///
/// Two image paragraphs are adjacent when they are neighbouring element children of the same
/// container. Anything else between them, including elements that render nothing, ends the run.
/// Runs over the whole slice in one pass and may be called again after edits.
pub fn mark_image_groups(blocks: &mut [Block]) {
    for i in 0..blocks.len() {
        let continued = blocks.get(i + 1).is_some_and(|next| {
            next.is_image() && blocks[i].placement.is_followed_by(&next.placement)
        });
        if let BlockKind::Image(image) = &mut blocks[i].kind {
            image.last_in_group = !continued;
        }
    }
}

/// Index ranges of the image runs in `blocks`, in document order.
pub fn image_groups(blocks: &[Block]) -> Vec<Range<usize>> {
    let mut groups = Vec::new();
    let mut start: Option<usize> = None;
    for (i, block) in blocks.iter().enumerate() {
        let Some(image) = block.image() else {
            start = None;
            continue;
        };
        let first = *start.get_or_insert(i);
        if image.last_in_group {
            groups.push(first..i + 1);
            start = None;
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContentDocument;
    use crate::document::ContentOptions;
    use crate::document::ImageBlock;
    use crate::document::Placement;
    use crate::document::Prefix;
    use crate::document::ProseBlock;

    fn image(parent: u32, index: u32) -> Block {
        Block {
            kind: BlockKind::Image(ImageBlock {
                url: format!("https://x/{parent}-{index}.jpg"),
                alt: String::new(),
                last_in_group: false,
            }),
            placement: Placement { parent, index },
            prefix: Prefix::default(),
            gap: None,
        }
    }

    fn prose(parent: u32, index: u32) -> Block {
        Block {
            kind: BlockKind::Prose(ProseBlock { lines: vec![] }),
            placement: Placement { parent, index },
            prefix: Prefix::default(),
            gap: None,
        }
    }

    fn last_flags(blocks: &[Block]) -> Vec<Option<bool>> {
        blocks
            .iter()
            .map(|b| b.image().map(|i| i.last_in_group))
            .collect()
    }

    #[test]
    fn tags_last_image_of_each_run() {
        let mut blocks = vec![
            image(0, 0),
            image(0, 1),
            image(0, 2),
            prose(0, 3),
            image(0, 4),
        ];
        mark_image_groups(&mut blocks);
        assert_eq!(
            last_flags(&blocks),
            [Some(false), Some(false), Some(true), None, Some(true)]
        );
        assert_eq!(image_groups(&blocks), [0..3, 4..5]);
    }

    #[test]
    fn skipped_slot_breaks_a_run() {
        // Index 1 is an element that produced no block.
        let mut blocks = vec![image(0, 0), image(0, 2)];
        mark_image_groups(&mut blocks);
        assert_eq!(last_flags(&blocks), [Some(true), Some(true)]);
    }

    #[test]
    fn different_containers_never_group() {
        let mut blocks = vec![image(0, 0), image(1, 1)];
        mark_image_groups(&mut blocks);
        assert_eq!(last_flags(&blocks), [Some(true), Some(true)]);
    }

    #[test]
    fn marking_again_is_stable() {
        let mut blocks = vec![image(0, 0), image(0, 1)];
        mark_image_groups(&mut blocks);
        let once = blocks.clone();
        mark_image_groups(&mut blocks);
        assert_eq!(blocks, once);
    }

    #[test]
    fn groups_images_from_markdown() {
        let md = "![a](a.jpg)\n\n![b](b.jpg)\n\ntext\n\n![c](c.jpg)\n\n> ![d](d.jpg)\n";
        let doc = ContentDocument::parse(md, &ContentOptions::default());
        assert_eq!(
            last_flags(doc.blocks()),
            [Some(false), Some(true), None, Some(true), Some(true)]
        );
    }

    #[test]
    fn html_between_images_ends_the_run() {
        let md = "![a](a.jpg)\n\n<!-- note -->\n\n![b](b.jpg)\n";
        let doc = ContentDocument::parse(md, &ContentOptions::default());
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(last_flags(doc.blocks()), [Some(true), Some(true)]);
    }
}
