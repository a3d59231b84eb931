//! Menu rendering.
//!
//! Each bundle becomes a submenu `<root>.<bucket>.<name>` holding one
//! section per non-empty record sequence. Sections are laid out purely by
//! priority:
//!
//! | Section       | Separator | Title | Items          |
//! |---------------|-----------|-------|----------------|
//! | Help          |           | 110   | 120, 125       |
//! | Commands      | 130       | 140   | 150            |
//! | Mappings      | 160       | 170   | 180            |
//! | Files         | 190       | 200   | 210.10 - 210.30 |
//! | Abbreviations | 220       | 230   | 240            |
//! | Functions     | 250       | 260   | 270            |
//! | Highlights    | 280       | 290   | 300            |
//!
//! Titles and informational items are followed by an `amenu disable` line
//! so they show greyed out.

use std::path::Path;

use headlights_core::{
    AbbreviationRecord, Bundle, CommandRecord, FunctionRecord, HighlightRecord, MappingRecord,
    MenuConfig, MenuItem, Platform, Priority,
};

use crate::categorize::Categorizer;

/// Escapes text for use inside a menu path.
///
/// # Examples
///
/// ```
/// use headlights_menu::render::escape_label;
///
/// assert_eq!(escape_label("a.b c"), "a\\.b\\ c");
/// assert_eq!(escape_label("<Leader>|x"), "\\<Leader>\\|x");
/// assert_eq!(escape_label("C:\\vim"), "C:\\\\vim");
/// ```
pub fn escape_label(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('.', "\\.")
        .replace(' ', "\\ ")
        .replace('<', "\\<")
}

/// Label of a file path: the whole path, or `<` and its trailing `limit`
/// characters when it is longer.
///
/// # Examples
///
/// ```
/// use headlights_menu::render::truncate_path_label;
///
/// assert_eq!(truncate_path_label("/a/b.vim", 30), "/a/b\\.vim");
/// assert_eq!(truncate_path_label("/very/long/path/x.vim", 5), "\\<x\\.vim");
/// ```
pub fn truncate_path_label(path: &str, limit: usize) -> String {
    let count = path.chars().count();
    if count <= limit {
        return escape_label(path);
    }
    let tail: String = path.chars().skip(count - limit).collect();
    format!("\\<{}", escape_label(&tail))
}

/// Label of an abbreviation: its first `limit` characters followed by `>`
/// when it is longer.
pub fn truncate_head_label(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return escape_label(text);
    }
    let head: String = text.chars().take(limit).collect();
    format!("{}>", escape_label(&head))
}

/// Sorts menu lines case-insensitively, ties broken by the exact text, and
/// drops repeats.
pub fn sort_menus(menus: &mut Vec<String>) {
    menus.sort_by_cached_key(|menu| (menu.to_lowercase(), menu.clone()));
    menus.dedup();
}

fn parent_dir(path: &str) -> String {
    Path::new(path)
        .parent()
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Dotted path with escaped dots turned back into plain ones, usable as a
/// command argument.
fn command_path(path: &str) -> String {
    escape_label(path).replace("\\.", ".")
}

/// Items of the debug submenu pointing at a written debug log.
///
/// # Examples
///
/// ```
/// use headlights_core::Platform;
/// use headlights_menu::render::render_debug_menu;
///
/// let menus = render_debug_menu("Bundles", "/tmp/headlights_x.log", Platform::Other);
/// assert_eq!(menus[0], "amenu 300 Bundles.-SepX- :");
/// assert_eq!(menus.len(), 3);
/// ```
pub fn render_debug_menu(root: &str, log_path: &str, platform: Platform) -> Vec<String> {
    let log_dir = parent_dir(log_path);
    let segments = |leaf: &str| vec![root.to_string(), "debug".to_string(), leaf.to_string()];

    let mut items = vec![
        MenuItem::create(Priority::new(300), vec![root.to_string(), "-SepX-".to_string()], ":"),
        MenuItem::create(
            Priority::new(310),
            segments("Open\\ Log"),
            &format!(":{} {}<CR>", platform.open_command(), command_path(log_path)),
        )
        .with_secondary(escape_label(log_path)),
        MenuItem::create(
            Priority::new(320),
            segments("Explore\\ in\\ Vim"),
            &format!(":Explore {}<CR>", command_path(&log_dir)),
        )
        .with_secondary(escape_label(&log_dir)),
    ];
    if let Some(reveal) = platform.reveal_command() {
        items.push(
            MenuItem::create(
                Priority::new(330),
                segments("Explore\\ in\\ System"),
                &format!(":{reveal} {}<CR>", command_path(&log_dir)),
            )
            .with_secondary(escape_label(&log_dir)),
        );
    }
    items.iter().map(MenuItem::to_command).collect()
}

/// Renders bundles into menu lines.
pub struct MenuRenderer<'a> {
    config: &'a MenuConfig,
    categorizer: &'a Categorizer,
}

impl<'a> MenuRenderer<'a> {
    pub fn new(config: &'a MenuConfig, categorizer: &'a Categorizer) -> Self {
        Self {
            config,
            categorizer,
        }
    }

    /// Renders every bundle and returns the sorted, de-duplicated lines.
    pub fn render<'b>(&self, bundles: impl IntoIterator<Item = &'b Bundle>) -> Vec<String> {
        let mut menus: Vec<String> = bundles
            .into_iter()
            .flat_map(|bundle| self.bundle_items(bundle))
            .map(|item| item.to_command())
            .collect();
        sort_menus(&mut menus);
        menus
    }

    /// Menu items of one bundle, in section order.
    pub fn bundle_items(&self, bundle: &Bundle) -> Vec<MenuItem> {
        let prefix = Prefix {
            segments: vec![
                self.config.menu_root.clone(),
                escape_label(self.categorizer.categorize(bundle)),
                escape_label(bundle.name.trim_start_matches('.')),
            ],
        };

        let mut items = Vec::new();
        self.help_section(&prefix, bundle, &mut items);
        if !bundle.commands.is_empty() {
            commands_section(&prefix, &bundle.commands, &mut items);
        }
        if !bundle.mappings.is_empty() {
            mappings_section(&prefix, &bundle.mappings, &mut items);
        }
        if self.config.show_files {
            self.files_section(&prefix, &bundle.path, &mut items);
        }
        if !bundle.abbreviations.is_empty() {
            self.abbreviations_section(&prefix, &bundle.abbreviations, &mut items);
        }
        if !bundle.functions.is_empty() {
            functions_section(&prefix, &bundle.functions, &mut items);
        }
        if !bundle.highlights.is_empty() {
            highlights_section(&prefix, &bundle.highlights, &mut items);
        }
        items
    }

    fn help_section(&self, prefix: &Prefix, bundle: &Bundle, items: &mut Vec<MenuItem>) {
        let name = escape_label(bundle.name.trim_start_matches('.'));
        prefix.title(110, "Help", items);
        items.push(
            MenuItem::create(
                Priority::new(120),
                prefix.with(&["Doc"]),
                &format!(":help {name}<CR>"),
            )
            .with_secondary(format!("help\\ {name}")),
        );
        if self.config.show_load_order {
            let path = prefix.with(&["Load\\ Order"]);
            items.push(
                MenuItem::create(Priority::new(125), path.clone(), ":")
                    .with_secondary(bundle.order.to_string()),
            );
            items.push(MenuItem::disable(path));
        }
    }

    fn files_section(&self, prefix: &Prefix, path: &str, items: &mut Vec<MenuItem>) {
        let platform = self.config.platform;
        let label = truncate_path_label(path, self.config.truncation_limit);
        let dir = parent_dir(path);

        prefix.separator(190, "-Sep3-", items);
        prefix.title(200, "Files", items);
        items.push(
            MenuItem::create(
                Priority::sub(210, 10),
                prefix.with(&[label.as_str(), "Open\\ File"]),
                &format!(":{} {}<CR>", platform.open_command(), command_path(path)),
            )
            .with_secondary(escape_label(path)),
        );
        items.push(
            MenuItem::create(
                Priority::sub(210, 20),
                prefix.with(&[label.as_str(), "Sexplore\\ in\\ Vim"]),
                &format!(":Sexplore {}<CR>", command_path(&dir)),
            )
            .with_secondary(escape_label(&dir)),
        );
        if let Some(reveal) = platform.reveal_command() {
            items.push(
                MenuItem::create(
                    Priority::sub(210, 30),
                    prefix.with(&[label.as_str(), "Explore\\ in\\ System"]),
                    &format!(":{reveal} {}<CR>", command_path(&dir)),
                )
                .with_secondary(escape_label(&dir)),
            );
        }
    }

    fn abbreviations_section(
        &self,
        prefix: &Prefix,
        abbreviations: &[AbbreviationRecord],
        items: &mut Vec<MenuItem>,
    ) {
        prefix.separator(220, "-Sep4-", items);
        prefix.title(230, "Abbreviations", items);
        for abbreviation in abbreviations {
            let path = prefix.with(&[
                &escape_label(abbreviation.mode.label()),
                &truncate_head_label(&abbreviation.lhs, self.config.truncation_limit),
            ]);
            let rhs = if abbreviation.is_expr {
                format!("<expr> {}", abbreviation.rhs)
            } else {
                abbreviation.rhs.clone()
            };
            items.push(
                MenuItem::create(Priority::new(240), path.clone(), ":<CR>")
                    .with_secondary(escape_label(&rhs)),
            );
            items.push(MenuItem::disable(path));
        }
    }
}

/// Escaped `<root>.<bucket>.<name>` segments of one bundle.
struct Prefix {
    segments: Vec<String>,
}

impl Prefix {
    fn with<S: AsRef<str>>(&self, leaves: &[S]) -> Vec<String> {
        let mut segments = self.segments.clone();
        segments.extend(leaves.iter().map(|leaf| leaf.as_ref().to_string()));
        segments
    }

    fn separator(&self, priority: u16, label: &str, items: &mut Vec<MenuItem>) {
        items.push(MenuItem::create(Priority::new(priority), self.with(&[label]), ":"));
    }

    fn title(&self, priority: u16, label: &str, items: &mut Vec<MenuItem>) {
        let path = self.with(&[label]);
        items.push(MenuItem::create(Priority::new(priority), path.clone(), ":"));
        items.push(MenuItem::disable(path));
    }
}

fn buffer_label(text: &str, is_buffer_local: bool) -> String {
    if is_buffer_local {
        escape_label(&format!("@ {text}"))
    } else {
        escape_label(text)
    }
}

fn commands_section(prefix: &Prefix, commands: &[CommandRecord], items: &mut Vec<MenuItem>) {
    prefix.separator(130, "-Sep1-", items);
    prefix.title(140, "Commands", items);
    for command in commands {
        items.push(
            MenuItem::create(
                Priority::new(150),
                prefix.with(&[&buffer_label(&command.name, command.is_buffer_local)]),
                &format!(":{}<CR>", command.name),
            )
            .with_secondary(format!(":{}", escape_label(&command.definition))),
        );
    }
}

fn mappings_section(prefix: &Prefix, mappings: &[MappingRecord], items: &mut Vec<MenuItem>) {
    prefix.separator(160, "-Sep2-", items);
    prefix.title(170, "Mappings", items);
    for mapping in mappings {
        let path = prefix.with(&[
            &escape_label(mapping.mode.label()),
            &buffer_label(&mapping.lhs, mapping.is_buffer_local),
        ]);
        items.push(
            MenuItem::create(Priority::new(180), path.clone(), ":")
                .with_secondary(escape_label(&mapping.rhs)),
        );
        items.push(MenuItem::disable(path));
    }
}

fn functions_section(prefix: &Prefix, functions: &[FunctionRecord], items: &mut Vec<MenuItem>) {
    prefix.separator(250, "-Sep5-", items);
    prefix.title(260, "Functions", items);
    for function in functions {
        let path = prefix.with(&[&format!("{}()", escape_label(&function.name))]);
        items.push(MenuItem::create(Priority::new(270), path.clone(), ":"));
        items.push(MenuItem::disable(path));
    }
}

fn highlights_section(prefix: &Prefix, highlights: &[HighlightRecord], items: &mut Vec<MenuItem>) {
    prefix.separator(280, "-Sep6-", items);
    prefix.title(290, "Highlights", items);
    for highlight in highlights {
        items.push(
            MenuItem::create(
                Priority::new(300),
                prefix.with(&[&escape_label(&highlight.group)]),
                &format!(":highlight {}<CR>", highlight.group),
            )
            .with_secondary(escape_label(&highlight.attribute_summary())),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headlights_core::{HighlightAttribute, Mode, Record};

    fn config() -> MenuConfig {
        MenuConfig {
            platform: Platform::Linux,
            ..MenuConfig::default()
        }
    }

    fn render(config: &MenuConfig, bundles: &[Bundle]) -> Vec<String> {
        let categorizer = Categorizer::from_config(config).unwrap();
        MenuRenderer::new(config, &categorizer).render(bundles)
    }

    #[test]
    fn test_escape_order_keeps_backslashes_single_pass() {
        assert_eq!(escape_label("a\\.b"), "a\\\\\\.b");
        assert_eq!(escape_label("x y"), "x\\ y");
    }

    #[test]
    fn test_path_truncation_keeps_trailing_characters() {
        let path = "/home/user/.vim/bundle/some-plugin/plugin/some-plugin.vim";
        let label = truncate_path_label(path, 30);
        let tail: String = path.chars().skip(path.chars().count() - 30).collect();
        assert_eq!(label, format!("\\<{}", escape_label(&tail)));
        assert_eq!(truncate_path_label("/a.vim", 6), "/a\\.vim");
    }

    #[test]
    fn test_head_truncation() {
        assert_eq!(truncate_head_label("abcdef", 3), "abc>");
        assert_eq!(truncate_head_label("abc", 3), "abc");
    }

    #[test]
    fn test_sort_is_case_insensitive_and_deduplicates() {
        let mut menus = vec![
            "amenu 1 b".to_string(),
            "amenu 1 B".to_string(),
            "amenu 1 a".to_string(),
            "amenu 1 b".to_string(),
        ];
        sort_menus(&mut menus);
        assert_eq!(menus, vec!["amenu 1 a", "amenu 1 B", "amenu 1 b"]);
    }

    #[test]
    fn test_help_and_files_for_plain_bundle() {
        let bundle = Bundle::new("/p/surround.vim", "surround", 3);
        let menus = render(&config(), &[bundle]);
        let expected = [
            "amenu 110 Bundles.s-z.surround.Help :",
            "amenu disable Bundles.s-z.surround.Help",
            "amenu 120 Bundles.s-z.surround.Doc<Tab>help\\ surround :help surround<CR>",
            "amenu 190 Bundles.s-z.surround.-Sep3- :",
            "amenu 200 Bundles.s-z.surround.Files :",
            "amenu 210.10 Bundles.s-z.surround./p/surround\\.vim.Open\\ File<Tab>/p/surround\\.vim :edit /p/surround.vim<CR>",
            "amenu 210.20 Bundles.s-z.surround./p/surround\\.vim.Sexplore\\ in\\ Vim<Tab>/p :Sexplore /p<CR>",
            "amenu 210.30 Bundles.s-z.surround./p/surround\\.vim.Explore\\ in\\ System<Tab>/p :!xdg-open /p<CR>",
        ];
        for line in expected {
            assert!(menus.contains(&line.to_string()), "missing {line}\n{menus:#?}");
        }
        assert!(!menus.iter().any(|m| m.contains("Load\\ Order")));
    }

    #[test]
    fn test_load_order_and_hidden_files() {
        let config = MenuConfig {
            show_files: false,
            show_load_order: true,
            ..config()
        };
        let menus = render(&config, &[Bundle::new("/p/abolish.vim", "abolish", 42)]);
        assert!(menus.contains(&"amenu 125 Bundles.a-i.abolish.Load\\ Order<Tab>42 :".to_string()));
        assert!(menus.contains(&"amenu disable Bundles.a-i.abolish.Load\\ Order".to_string()));
        assert!(!menus.iter().any(|m| m.contains("Files")));
    }

    #[test]
    fn test_record_sections() {
        let mut bundle = Bundle::new("/p/tool.vim", "tool", 1);
        let mut local = CommandRecord::new("Run", "call tool#run()");
        local.is_buffer_local = true;
        bundle.push(Record::Command(local));
        bundle.push(Record::Mapping(MappingRecord {
            mode: Mode::Normal,
            lhs: "<Leader>t".into(),
            rhs: ":Run<CR>".into(),
            is_buffer_local: false,
            noremap: true,
            script_local: false,
        }));
        bundle.push(Record::Abbreviation(AbbreviationRecord {
            mode: Mode::Insert,
            lhs: "ts".into(),
            rhs: "strftime()".into(),
            is_expr: true,
        }));
        bundle.push(Record::Function(FunctionRecord { name: "ToolRun".into() }));
        bundle.push(Record::Highlight(HighlightRecord {
            group: "ToolMark".into(),
            attributes: vec![HighlightAttribute {
                terminal: "gui".into(),
                values: vec!["bold".into()],
            }],
        }));

        let config = MenuConfig {
            show_files: false,
            ..config()
        };
        let menus = render(&config, &[bundle]);
        let prefix = "Bundles.\u{2063}\u{2063}buffer.tool";
        let expected = [
            format!("amenu 150 {prefix}.@\\ Run<Tab>:call\\ tool#run() :Run<CR>"),
            format!("amenu 180 {prefix}.Normal.\\<Leader>t<Tab>:Run\\<CR> :"),
            format!("amenu disable {prefix}.Normal.\\<Leader>t"),
            format!("amenu 240 {prefix}.Insert.ts<Tab>\\<expr>\\ strftime() :<CR>"),
            format!("amenu 270 {prefix}.ToolRun() :"),
            format!("amenu disable {prefix}.ToolRun()"),
            format!("amenu 300 {prefix}.ToolMark<Tab>gui=bold :highlight ToolMark<CR>"),
            format!("amenu 280 {prefix}.-Sep6- :"),
            format!("amenu disable {prefix}.Highlights"),
        ];
        for line in &expected {
            assert!(menus.contains(line), "missing {line}\n{menus:#?}");
        }
    }

    #[test]
    fn test_long_abbreviation_is_truncated() {
        let mut bundle = Bundle::new("/p/abbr.vim", "abbr", 1);
        bundle.push(Record::Abbreviation(AbbreviationRecord {
            mode: Mode::Insert,
            lhs: "x".repeat(40),
            rhs: "y".into(),
            is_expr: false,
        }));
        let menus = render(&config(), &[bundle]);
        let label = format!("{}>", "x".repeat(30));
        assert!(menus.iter().any(|m| m.contains(&format!("Insert.{label}<Tab>y"))));
    }

    #[test]
    fn test_debug_menu_with_reveal() {
        let menus = render_debug_menu("Bundles", "/tmp/headlights_a.log", Platform::MacOs);
        assert_eq!(
            menus,
            vec![
                "amenu 300 Bundles.-SepX- :",
                "amenu 310 Bundles.debug.Open\\ Log<Tab>/tmp/headlights_a\\.log :!open -a MacVim /tmp/headlights_a.log<CR>",
                "amenu 320 Bundles.debug.Explore\\ in\\ Vim<Tab>/tmp :Explore /tmp<CR>",
                "amenu 330 Bundles.debug.Explore\\ in\\ System<Tab>/tmp :!open /tmp<CR>",
            ]
        );
    }
}
