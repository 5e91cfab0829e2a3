use folio_content::ContentDocument;
use folio_content::ContentOptions;
use folio_core::placeholder::EMPTY_STATE_MESSAGE;
use folio_core::theme::Theme;
use proptest::prelude::*;

fn rendered_text(md: &str, width: u16) -> Vec<String> {
    let options = ContentOptions::default();
    ContentDocument::parse(md, &options)
        .render(width, &Theme::default(), &options, None)
        .lines()
        .iter()
        .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}

proptest! {
    #[test]
    fn whitespace_only_content_renders_the_placeholder(ws in "[ \t\r\n]{0,40}") {
        let doc = ContentDocument::parse(&ws, &ContentOptions::default());
        prop_assert!(doc.is_placeholder());
        let lines = rendered_text(&ws, 50);
        prop_assert!(lines.iter().any(|l| l.contains(EMPTY_STATE_MESSAGE)));
    }

    #[test]
    fn arbitrary_markdown_renders_deterministically(
        md in "[a-z #*_>`|\\-\\[\\]()!\n]{0,200}",
        width in 1u16..80,
    ) {
        let doc = ContentDocument::parse(&md, &ContentOptions::default());
        prop_assert_eq!(doc.is_placeholder(), md.trim().is_empty());
        prop_assert_eq!(rendered_text(&md, width), rendered_text(&md, width));
    }

    #[test]
    fn every_image_run_ends_with_exactly_one_tagged_block(count in 1usize..6, gap_at in 0usize..6) {
        let mut md = String::new();
        for i in 0..count {
            if i == gap_at {
                md.push_str("text\n\n");
            }
            md.push_str(&format!("![p{i}](https://x/{i}.jpg)\n\n"));
        }
        let doc = ContentDocument::parse(&md, &ContentOptions::default());
        let groups = folio_content::grouping::image_groups(doc.blocks());
        let images = doc.blocks().iter().filter(|b| b.is_image()).count();
        prop_assert_eq!(images, count);
        prop_assert_eq!(groups.iter().map(|g| g.len()).sum::<usize>(), count);
        for g in groups {
            let last = g.end - 1;
            for i in g {
                let tagged = doc.blocks()[i].image().map(|img| img.last_in_group);
                prop_assert_eq!(tagged, Some(i == last));
            }
        }
    }
}
