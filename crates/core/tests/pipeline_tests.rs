// ABOUTME: Integration tests for the classprune pipeline.
// ABOUTME: Covers the documented scenarios, pipeline properties and file-based runs.

use classprune_core::{
    extract_selectors, locate_exempt_ranges, rewrite_classes, run, PruneConfig, Pruner,
    RenameRule, RenameRules, SelectorSet, DEFAULT_PROTECTED_TAGS,
};
use pretty_assertions::assert_eq;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<body class="page legacy-body">
  <div class="grid grid--wide  stale-helper">
    <div class="col bg-color-primary-light">One</div>
    <div class="col col-md-6 hover:underline">Two</div>
  </div>
  <pre><code class="language-html">&lt;div class="example legacy"&gt;</code></pre>
  <pre class="snippet">
    <span class="token tag">div</span>
  </pre>
  <p class="">empty</p>
</body>
</html>
"#;

const STYLESHEET: &str = r#"
.page { margin: 0 }
.grid, .grid--wide { display: grid }
.col { padding: 1rem }
.col-md-6 { width: 50% }
.hover\:underline:hover { text-decoration: underline }
.bg-secondary-lighter { background: #eee }
"#;

fn selectors(names: &[&str]) -> SelectorSet {
    names.iter().copied().collect()
}

fn rewrite(html: &str, set: &SelectorSet, renames: &RenameRules) -> classprune_core::Rewrite {
    let exempt = locate_exempt_ranges(html, DEFAULT_PROTECTED_TAGS);
    rewrite_classes(html, set, &exempt, renames)
}

mod scenario_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scenario_a_filters_unknown_token() {
        let out = rewrite(
            r#"<div class="foo baz bar"></div>"#,
            &selectors(&["foo", "bar"]),
            &RenameRules::new(),
        );
        assert_eq!(out.html, r#"<div class="foo bar"></div>"#);
        let removed: Vec<(&str, usize)> = out
            .report
            .iter()
            .map(|e| (e.class.as_str(), e.count))
            .collect();
        assert_eq!(removed, vec![("baz", 1)]);
    }

    #[test]
    fn scenario_b_rename_then_keep() {
        let renames: RenameRules = [RenameRule::new("x", "y")].into_iter().collect();
        let out = rewrite(r#"<b class="x"></b>"#, &selectors(&["y"]), &renames);
        assert_eq!(out.html, r#"<b class="y"></b>"#);
        assert!(out.report.is_empty());
    }

    #[test]
    fn scenario_c_empty_attribute() {
        let out = rewrite(r#"<i class=""></i>"#, &selectors(&["foo"]), &RenameRules::new());
        assert_eq!(out.html, r#"<i class=""></i>"#);
        assert_eq!(out.processed, 1);
        assert!(out.report.is_empty());
    }

    #[test]
    fn scenario_d_pre_block_untouched() {
        let html = r#"<pre><div class="ghost-class">text</div></pre>"#;
        let out = rewrite(html, &selectors(&[]), &RenameRules::new());
        assert_eq!(out.html, html);
        assert_eq!(out.processed, 0);
        assert!(out.report.is_empty());
    }

    #[test]
    fn scenario_e_escaped_and_plain_colons() {
        let set = extract_selectors(".foo\\:hover{color:red} .bar:hover{color:blue}");
        let mut names: Vec<&str> = set.iter().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["bar", "foo"]);
    }
}

mod property_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pruner() -> Pruner {
        Pruner::builder()
            .rename("bg-color-primary-light", "bg-secondary-lighter")
            .build()
    }

    #[test]
    fn full_page_is_cleaned() {
        let outcome = pruner().prune(STYLESHEET, PAGE).unwrap();
        assert!(outcome.html.contains(r#"<body class="page">"#));
        assert!(outcome.html.contains(r#"<div class="grid grid--wide">"#));
        assert!(outcome
            .html
            .contains(r#"<div class="col bg-secondary-lighter">One</div>"#));
        assert!(outcome
            .html
            .contains(r#"<div class="col col-md-6">Two</div>"#));
        assert_eq!(outcome.processed, 5);
        assert_eq!(outcome.report.count("legacy-body"), 1);
        assert_eq!(outcome.report.count("stale-helper"), 1);
        // the escaped variant selector only registers its base name
        assert_eq!(outcome.report.count("hover:underline"), 1);
        assert_eq!(outcome.report.distinct(), 3);
        assert!(outcome.unterminated.is_empty());
    }

    #[test]
    fn rewriting_twice_changes_nothing() {
        let set = extract_selectors(STYLESHEET);
        let renames: RenameRules =
            [RenameRule::new("bg-color-primary-light", "bg-secondary-lighter")]
                .into_iter()
                .collect();
        let once = rewrite(PAGE, &set, &renames);
        let twice = rewrite(&once.html, &set, &renames);
        assert_eq!(twice.html, once.html);
        assert!(twice.report.is_empty());
    }

    #[test]
    fn protected_blocks_are_byte_identical() {
        let outcome = pruner().prune(STYLESHEET, PAGE).unwrap();
        for block in [
            r#"<pre><code class="language-html">&lt;div class="example legacy"&gt;</code></pre>"#,
            "<pre class=\"snippet\">\n    <span class=\"token tag\">div</span>\n  </pre>",
        ] {
            assert!(PAGE.contains(block));
            assert!(outcome.html.contains(block), "block was modified: {}", block);
        }
    }

    #[test]
    fn output_tokens_are_defined_or_renamed() {
        let set = extract_selectors(STYLESHEET);
        let outcome = pruner().prune(STYLESHEET, PAGE).unwrap();
        let exempt = locate_exempt_ranges(&outcome.html, DEFAULT_PROTECTED_TAGS);
        let re = regex::Regex::new(r#"class="([^"]*)""#).unwrap();
        for caps in re.captures_iter(&outcome.html) {
            if exempt.contains(caps.get(0).unwrap().start()) {
                continue;
            }
            for token in caps[1].split_whitespace() {
                assert!(set.contains(token), "undefined token survived: {}", token);
            }
        }
    }

    #[test]
    fn report_total_matches_dropped_tokens() {
        let html = r#"<a class="a x y"></a><b class="x z z"></b><pre class="q"></pre>"#;
        let out = rewrite(html, &selectors(&["a"]), &RenameRules::new());
        // 2 dropped from the first attribute, 3 from the second
        assert_eq!(out.report.total(), 5);
        assert_eq!(out.report.count("x"), 2);
        assert_eq!(out.report.count("z"), 2);
        assert_eq!(out.report.count("q"), 0);
        let freq: Vec<&str> = out
            .report
            .by_frequency()
            .iter()
            .map(|e| e.class.as_str())
            .collect();
        assert_eq!(freq, vec!["x", "z", "y"]);
    }

    #[test]
    fn empty_stylesheet_strips_everything() {
        let outcome = Pruner::default()
            .prune("", r#"<p class="one two"></p>"#)
            .unwrap();
        assert_eq!(outcome.html, r#"<p class=""></p>"#);
        assert_eq!(outcome.report.total(), 2);
    }

    #[test]
    fn no_class_attributes_is_not_an_error() {
        let outcome = Pruner::default().prune(".a{}", "<p>plain</p>").unwrap();
        assert_eq!(outcome.html, "<p>plain</p>");
        assert_eq!(outcome.processed, 0);
        assert!(outcome.report.is_empty());
    }
}

mod file_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn run_writes_cleaned_file_next_to_markup() {
        let dir = TempDir::new().unwrap();
        let css = dir.path().join("site.css");
        let html = dir.path().join("page.html");
        fs::write(&css, STYLESHEET).unwrap();
        fs::write(&html, PAGE).unwrap();

        let config = PruneConfig {
            stylesheet: Some(css),
            markup: Some(html.clone()),
            renames: vec![RenameRule::new("bg-color-primary-light", "bg-secondary-lighter")],
            ..Default::default()
        };
        let summary = run(&config).unwrap();

        assert_eq!(summary.output, dir.path().join("page.html.cleaned"));
        let written = fs::read_to_string(&summary.output).unwrap();
        assert_eq!(written, summary.outcome.html);
        assert_eq!(fs::read_to_string(&html).unwrap(), PAGE);
    }

    #[test]
    fn run_overwrites_existing_output() {
        let dir = TempDir::new().unwrap();
        let css = dir.path().join("site.css");
        let html = dir.path().join("page.html");
        let out = dir.path().join("out.html");
        fs::write(&css, ".keep{}").unwrap();
        fs::write(&html, r#"<p class="keep drop"></p>"#).unwrap();
        fs::write(&out, "stale").unwrap();

        let config = PruneConfig {
            stylesheet: Some(css),
            markup: Some(html),
            output: Some(out.clone()),
            ..Default::default()
        };
        run(&config).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), r#"<p class="keep"></p>"#);
    }

    #[test]
    fn run_refuses_output_that_aliases_markup() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let css = dir.path().join("site.css");
        let html = dir.path().join("page.html");
        fs::write(&css, ".keep{}").unwrap();
        fs::write(&html, r#"<p class="keep drop"></p>"#).unwrap();

        let config = PruneConfig {
            stylesheet: Some(css),
            markup: Some(html.clone()),
            output: Some(dir.path().join("sub/../page.html")),
            ..Default::default()
        };
        assert!(run(&config).unwrap_err().is_config());
        assert_eq!(
            fs::read_to_string(&html).unwrap(),
            r#"<p class="keep drop"></p>"#
        );
    }

    #[test]
    fn missing_stylesheet_is_fatal() {
        let dir = TempDir::new().unwrap();
        let html = dir.path().join("page.html");
        fs::write(&html, "<p></p>").unwrap();

        let config = PruneConfig {
            stylesheet: Some(dir.path().join("missing.css")),
            markup: Some(html.clone()),
            ..Default::default()
        };
        let err = run(&config).unwrap_err();
        assert!(err.is_read());
        assert!(!dir.path().join("page.html.cleaned").exists());
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let dir = TempDir::new().unwrap();
        let css = dir.path().join("site.css");
        let html = dir.path().join("page.html");
        fs::write(&css, b".ok{}\xff").unwrap();
        fs::write(&html, b"<p class=\"ok bad\">\xfe</p>").unwrap();

        let outcome = Pruner::default().prune_files(&css, &html).unwrap();
        assert_eq!(outcome.html, "<p class=\"ok\">\u{FFFD}</p>");
        assert_eq!(outcome.lossy_inputs, vec![css, html]);
    }
}
