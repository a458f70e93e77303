use ngscrape_engine::{
    CardImageExtractor, DescriptionExtractor, Document, ExtractError, Field, FieldExtractor,
    MediaUrlExtractor, ParserMode, TitleExtractor,
};
use pretty_assertions::assert_eq;

fn doc(html: &str) -> Document {
    Document::from_html(html, ParserMode::Lenient).unwrap()
}

fn media(html: &str) -> Result<Option<String>, ExtractError> {
    MediaUrlExtractor.extract(&doc(html))
}

#[test]
fn media_url_is_unescaped_fourth_quoted_field() {
    let html = r#"<html><body><script>var embed_controller = new embedController([{"url":"https:\/\/uploads.example.net\/59593_game.swf?f1","is_published":true}]);</script></body></html>"#;
    assert_eq!(
        media(html).unwrap().as_deref(),
        Some("https://uploads.example.net/59593_game.swf?f1")
    );
}

#[test]
fn media_url_ignores_quotes_before_the_marker() {
    let html = r#"<script>
        var title = "Alien \"Homonid\"";
        var embed_controller = new embedController([{"url":"https:\/\/uploads.ungrounded.net\/59000\/59593_alien_booya.swf?f1101313499","is_published":true,"width":550}]);
        var other = "x";
    </script>"#;
    assert_eq!(
        media(html).unwrap().as_deref(),
        Some("https://uploads.ungrounded.net/59000/59593_alien_booya.swf?f1101313499")
    );
}

#[test]
fn media_url_uses_first_script_with_marker() {
    let html = r#"
        <script>console.log("no config here");</script>
        <script>var embed_controller = new embedController([{"url":"https:\/\/a.example\/first.swf"}]);</script>
        <script>var embed_controller = new embedController([{"url":"https:\/\/a.example\/second.swf"}]);</script>
    "#;
    assert_eq!(media(html).unwrap().as_deref(), Some("https://a.example/first.swf"));
}

#[test]
fn media_url_not_found_without_marker() {
    assert_eq!(media("<html><body><p>no scripts</p></body></html>"), Ok(None));
    assert_eq!(
        media(r#"<script>var embed = {"url":"https://a.example/x.swf"};</script>"#),
        Ok(None)
    );
}

#[test]
fn unterminated_media_url_is_malformed() {
    let html = r#"<script>var embed_controller = new embedController([{"url":"https:\/\/a.example\/cut</script>"#;
    let err = media(html).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::MalformedSource {
            field: Field::MediaUrl,
            ..
        }
    ));
}

#[test]
fn empty_media_url_is_malformed() {
    let empty = r#"<script>var embed_controller = new embedController([{"url":"","is_published":true}]);</script>"#;
    assert!(matches!(media(empty), Err(ExtractError::MalformedSource { .. })));
}

#[test]
fn relative_media_url_is_returned_verbatim() {
    let protocol_relative = r#"<script>var embed_controller = new embedController([{"url":"\/\/uploads.example.net\/59593_game.swf?f1","is_published":true}]);</script>"#;
    assert_eq!(
        media(protocol_relative).unwrap().as_deref(),
        Some("//uploads.example.net/59593_game.swf?f1")
    );

    let root_relative = r#"<script>var embed_controller = new embedController([{"url":"\/content\/59593_game.swf","is_published":true}]);</script>"#;
    assert_eq!(
        media(root_relative).unwrap().as_deref(),
        Some("/content/59593_game.swf")
    );
}

#[test]
fn card_is_first_og_image_content_verbatim() {
    let html = r#"<head>
        <meta charset="utf-8">
        <meta name="description" content="not this">
        <meta property="og:title" content="Alien Homonid">
        <meta property="og:image" content="https://picon.ngfiles.com/59000/flash_59593_card.png?f1607717241">
        <meta property="og:image" content="https://picon.ngfiles.com/other.png">
    </head>"#;
    assert_eq!(
        CardImageExtractor.extract(&doc(html)).unwrap().as_deref(),
        Some("https://picon.ngfiles.com/59000/flash_59593_card.png?f1607717241")
    );
}

#[test]
fn card_not_found_without_og_image() {
    let html = r#"<head><meta name="og:image" content="x.png"><meta property="og:description" content="d"></head>"#;
    assert_eq!(CardImageExtractor.extract(&doc(html)), Ok(None));
}

#[test]
fn og_image_without_content_is_skipped() {
    let html = r#"<head><meta property="og:image"><meta property="og:image" content="https://a.example/c.jpg"></head>"#;
    assert_eq!(
        CardImageExtractor.extract(&doc(html)).unwrap().as_deref(),
        Some("https://a.example/c.jpg")
    );
}

#[test]
fn description_comes_from_og_description() {
    let html = r#"<head>
        <meta property="og:image" content="https://a.example/c.png">
        <meta property="og:description" content="Blast FBI agents in this Metal Slug style shooter!">
    </head>"#;
    assert_eq!(
        DescriptionExtractor.extract(&doc(html)).unwrap().as_deref(),
        Some("Blast FBI agents in this Metal Slug style shooter!")
    );
    assert_eq!(DescriptionExtractor.extract(&doc("<p>none</p>")), Ok(None));
}

#[test]
fn title_is_first_title_text() {
    let html = "<html><head><title>Alien Homonid</title></head><body></body></html>";
    assert_eq!(
        TitleExtractor.extract(&doc(html)).unwrap().as_deref(),
        Some("Alien Homonid")
    );
    assert_eq!(TitleExtractor.extract(&doc("<p>untitled</p>")), Ok(None));
}

#[test]
fn extractors_run_independently_on_one_document() {
    let html = r#"<html><head>
        <title>Alien Homonid</title>
        <meta property="og:description" content="Shooter">
    </head><body>
        <script>var embed_controller = new embedController([{"url":"</script>
    </body></html>"#;
    let page = doc(html);
    assert!(MediaUrlExtractor.extract(&page).is_err());
    assert_eq!(DescriptionExtractor.extract(&page).unwrap().as_deref(), Some("Shooter"));
    assert_eq!(TitleExtractor.extract(&page).unwrap().as_deref(), Some("Alien Homonid"));
}
