use std::fs;
use std::path::PathBuf;

use headlights_core::{MenuConfig, Mode, ParseError, Platform, RecordKind};
use headlights_menu::categorize::{BUFFER_BUCKET, CONFIG_BUCKET};
use headlights_menu::path::PathNormalizer;
use headlights_menu::render::escape_label;
use headlights_menu::report::CategorizedBundle;
use headlights_menu::{IntrospectionInput, MenuRun, build_menus_with};

const FUGITIVE: &str = "/home/u/.vim/bundle/vim-fugitive/plugin/fugitive.vim";

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("fixture file must be readable")
}

fn fixture_input() -> IntrospectionInput {
    IntrospectionInput::new(fixture("scriptnames.txt"))
        .with_block(RecordKind::Commands, fixture("commands.txt"))
        .with_block(RecordKind::Mappings, fixture("mappings.txt"))
        .with_block(RecordKind::Abbreviations, fixture("abbreviations.txt"))
        .with_block(RecordKind::Functions, fixture("functions.txt"))
        .with_block(RecordKind::Highlights, fixture("highlights.txt"))
}

fn config() -> MenuConfig {
    MenuConfig {
        platform: Platform::Linux,
        ..MenuConfig::default()
    }
}

fn run(input: &IntrospectionInput, config: &MenuConfig) -> MenuRun {
    let normalizer = PathNormalizer::with_home("/home/u").without_symlink_resolution();
    build_menus_with(input, config, normalizer).expect("run should succeed")
}

fn bundle<'a>(run: &'a MenuRun, path: &str) -> &'a CategorizedBundle {
    run.bundles
        .iter()
        .find(|b| b.bundle.path == path)
        .unwrap_or_else(|| panic!("no bundle for {path}"))
}

#[test]
fn test_fixture_records_reach_their_scripts() {
    let run = run(&fixture_input(), &config());
    assert_eq!(run.bundles.len(), 10);

    let fugitive = &bundle(&run, FUGITIVE).bundle;
    assert_eq!(fugitive.name, "fugitive");
    assert_eq!(fugitive.commands[0].name, "Gstatus");
    assert!(fugitive.commands[0].bang);
    let gwrite = &fugitive.commands[1];
    assert_eq!(gwrite.name, "Gwrite");
    assert!(gwrite.bang);
    assert_eq!(gwrite.address_type.as_deref(), Some("buf"));
    assert_eq!(gwrite.complete.as_deref(), Some("file"));
    assert_eq!(gwrite.definition, "call fugitive#WriteCommand(<q-args>)");
    assert_eq!(fugitive.mappings.len(), 1);
    assert_eq!(fugitive.functions[0].name, "FugitiveStatusline");

    let nerdtree = &bundle(&run, "/home/u/.vim/bundle/nerdtree/plugin/NERD_tree.vim").bundle;
    assert_eq!(nerdtree.commands[0].complete.as_deref(), Some("dir"));
    let modes: Vec<Mode> = nerdtree.mappings.iter().map(|m| m.mode).collect();
    assert_eq!(modes, vec![Mode::Normal, Mode::VisualSelect]);
    assert_eq!(nerdtree.functions.len(), 1);

    let autoload = &bundle(&run, "/home/u/.vim/bundle/vim-fugitive/autoload/fugitive.vim").bundle;
    assert!(autoload.is_empty());
}

#[test]
fn test_fixture_malformed_line_is_the_only_error() {
    let run = run(&fixture_input(), &config());
    assert_eq!(run.errors.len(), 1, "{:?}", run.errors);
    assert_eq!(
        run.errors[0],
        ParseError::Structural {
            kind: RecordKind::Mappings,
            line: "Error detected while processing mappings".into(),
            reason: "lhs/rhs not found".into(),
        }
    );
}

#[test]
fn test_fixture_buckets() {
    let run = run(&fixture_input(), &config());
    let cases = [
        ("/usr/share/vim/vimrc", CONFIG_BUCKET),
        ("/home/u/.vimrc", CONFIG_BUCKET),
        ("/home/u/.vim/autoload/pathogen.vim", "j-r"),
        (FUGITIVE, "a-i"),
        ("/home/u/.vim/bundle/nerdtree/plugin/NERD_tree.vim", "j-r"),
        ("/home/u/.vim/bundle/vim-surround/plugin/surround.vim", "s-z"),
        ("/home/u/.vim/bundle/3tool/plugin/3tool.vim", "0-9"),
        ("/home/u/.vim/colors/dusk.vim", "a-i"),
        ("/usr/local/share/nvim/runtime/ftplugin/rust.vim", BUFFER_BUCKET),
    ];
    for (path, expected) in cases {
        assert_eq!(bundle(&run, path).bucket, expected, "{path}");
    }
    // the buffer-local command does not pull the rc file out of its bucket
    assert!(bundle(&run, "/home/u/.vimrc").bundle.is_buffer_local);
}

#[test]
fn test_fixture_abbreviations_and_highlights() {
    let run = run(&fixture_input(), &config());

    let rc = &bundle(&run, "/home/u/.vimrc").bundle;
    assert_eq!(rc.abbreviations.len(), 2);
    assert_eq!(rc.abbreviations[1].mode, Mode::InsertCommandLine);

    let tool = &bundle(&run, "/home/u/.vim/bundle/3tool/plugin/3tool.vim").bundle;
    assert!(tool.abbreviations[0].is_expr);
    assert_eq!(tool.abbreviations[0].rhs, "strftime('%Y-%m-%d')");

    let dusk = &bundle(&run, "/home/u/.vim/colors/dusk.vim").bundle;
    let groups: Vec<&str> = dusk.highlights.iter().map(|h| h.group.as_str()).collect();
    assert_eq!(groups, vec!["SpecialKey", "Comment"]);
    assert_eq!(
        dusk.highlights[1].attribute_summary(),
        "term=bold ctermfg=14 guifg=#80a0ff gui=italic"
    );
}

#[test]
fn test_fixture_run_is_idempotent() {
    let input = fixture_input();
    let first = run(&input, &config());
    let second = run(&input, &config());
    assert_eq!(first.menus, second.menus);
    assert!(!first.menus.is_empty());
}

#[test]
fn test_fixture_menus_are_sorted_and_unique() {
    let run = run(&fixture_input(), &config());
    let mut sorted = run.menus.clone();
    sorted.sort_by_key(|menu| (menu.to_lowercase(), menu.clone()));
    sorted.dedup();
    assert_eq!(run.menus, sorted);
}

#[test]
fn test_fixture_long_path_is_truncated_to_its_tail() {
    let run = run(&fixture_input(), &config());
    let tail: String = FUGITIVE
        .chars()
        .skip(FUGITIVE.chars().count() - 30)
        .collect();
    let open = format!(
        "amenu 210.10 Bundles.a-i.fugitive.\\<{}.Open\\ File<Tab>{} :edit {FUGITIVE}<CR>",
        escape_label(&tail),
        escape_label(FUGITIVE)
    );
    assert!(run.menus.contains(&open), "missing {open}");
}

#[test]
fn test_end_to_end_rc_command() {
    let input = IntrospectionInput::new("1: /home/u/.vimrc").with_block(
        RecordKind::Commands,
        "Name Args Range Complete Definition\nFoo 0 . file :echo 1\n\tLast set from /home/u/.vimrc",
    );
    let config = MenuConfig {
        show_files: false,
        ..config()
    };
    let run = run(&input, &config);

    assert_eq!(run.bundles.len(), 1);
    let rc = &run.bundles[0];
    assert_eq!(rc.bucket, CONFIG_BUCKET);
    assert_eq!(rc.bundle.commands.len(), 1);
    assert_eq!(rc.bundle.commands[0].name, "Foo");
    assert_eq!(rc.bundle.commands[0].definition, "echo 1");

    let p = format!("Bundles.{CONFIG_BUCKET}.vimrc");
    assert_eq!(
        run.menus,
        vec![
            format!("amenu 110 {p}.Help :"),
            format!("amenu 120 {p}.Doc<Tab>help\\ vimrc :help vimrc<CR>"),
            format!("amenu 130 {p}.-Sep1- :"),
            format!("amenu 140 {p}.Commands :"),
            format!("amenu 150 {p}.Foo<Tab>:echo\\ 1 :Foo<CR>"),
            format!("amenu disable {p}.Commands"),
            format!("amenu disable {p}.Help"),
        ]
    );
}

#[test]
fn test_buckets_render_in_label_order() {
    let input = IntrospectionInput::new(
        "1: /p/Zebra.vim\n2: /p/banana.vim\n3: /p/3tool.vim\n4: /p/Apple.vim",
    );
    let config = MenuConfig {
        show_files: false,
        ..config()
    };
    let run = run(&input, &config);

    let buckets: Vec<(&str, &str)> = run
        .bundles
        .iter()
        .map(|b| (b.bundle.name.as_str(), b.bucket.as_str()))
        .collect();
    assert!(buckets.contains(&("Apple", "a-i")));
    assert!(buckets.contains(&("banana", "a-i")));
    assert!(buckets.contains(&("Zebra", "s-z")));
    assert!(buckets.contains(&("3tool", "0-9")));

    let help_lines: Vec<&String> = run
        .menus
        .iter()
        .filter(|menu| menu.starts_with("amenu 110 "))
        .collect();
    assert_eq!(
        help_lines,
        vec![
            "amenu 110 Bundles.0-9.3tool.Help :",
            "amenu 110 Bundles.a-i.Apple.Help :",
            "amenu 110 Bundles.a-i.banana.Help :",
            "amenu 110 Bundles.s-z.Zebra.Help :",
        ]
    );
}

#[test]
fn test_malformed_mapping_is_isolated() {
    let input = IntrospectionInput::new("1: /p/keys.vim").with_block(
        RecordKind::Mappings,
        "n  <Leader>a  * :A<CR>\n\tLast set from /p/keys.vim\n\
         ???\n\tLast set from /p/keys.vim\n\
         n  <Leader>c  * :C<CR>\n\tLast set from /p/keys.vim",
    );
    let run = run(&input, &config());

    assert_eq!(run.errors.len(), 1);
    assert!(matches!(run.errors[0], ParseError::Structural { .. }));
    let keys = &run.bundles[0].bundle;
    let lhs: Vec<&str> = keys.mappings.iter().map(|m| m.lhs.as_str()).collect();
    assert_eq!(lhs, vec!["<Leader>a", "<Leader>c"]);
}

#[test]
fn test_smart_menus_merge_plugin_scripts() {
    let input = IntrospectionInput::new(
        "1: /home/u/.vim/bundle/x/plugin/x.vim\n2: /home/u/.vim/bundle/x/autoload/x_util.vim",
    )
    .with_block(
        RecordKind::Functions,
        "function XUtil()\n\tLast set from /home/u/.vim/bundle/x/autoload/x_util.vim",
    );
    let config = MenuConfig {
        smart_menus: true,
        show_files: false,
        ..config()
    };
    let run = run(&input, &config);

    assert!(run.bundles.iter().all(|b| b.bundle.name == "x"));
    let help = run
        .menus
        .iter()
        .filter(|menu| menu.as_str() == "amenu 110 Bundles.s-z.x.Help :")
        .count();
    assert_eq!(help, 1);
    assert!(run.menus.contains(&"amenu 270 Bundles.s-z.x.XUtil() :".to_string()));

    let plain = run_without_smart(&input);
    assert!(plain.bundles.iter().any(|b| b.bundle.name == "x_util"));
}

fn run_without_smart(input: &IntrospectionInput) -> MenuRun {
    let config = MenuConfig {
        show_files: false,
        ..config()
    };
    run(input, &config)
}

#[test]
fn test_skipped_highlights_produce_no_errors() {
    let input = IntrospectionInput::new("1: /p/scheme.vim").with_block(
        RecordKind::Highlights,
        "String         xxx links to Constant\nSpellRare      xxx cleared\n\
         Title          xxx gui=bold\n\tLast set from /p/scheme.vim",
    );
    let run = run(&input, &config());
    assert!(run.errors.is_empty(), "{:?}", run.errors);
    assert_eq!(run.bundles[0].bundle.highlights.len(), 1);
}
