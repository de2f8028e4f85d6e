use eframe::egui;
use indextree::NodeId;

use foldertree::config::{AppConfig, TreeStyle};
use foldertree::expansion::VisibleRow;
use foldertree::fonts;
use foldertree::tree::{DirTree, TreeEntry};
use foldertree::viewer::Viewer;

const HOVER_FILL: egui::Color32 = egui::Color32::from_rgb(0xe8, 0xf2, 0xff);

fn main() -> anyhow::Result<()> {
    foldertree::init_logging();

    let config = AppConfig::load()?;
    tracing::debug!(?config, "Loaded configuration");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_title(config.window.title.clone()),
        ..Default::default()
    };

    eframe::run_native(
        "foldertree",
        options,
        Box::new(move |cc| {
            configure_custom_style(&cc.egui_ctx, &config.tree);
            Box::new(FolderTreeApp::new(config.tree))
        }),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
}

fn rgb([r, g, b]: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(r, g, b)
}

fn configure_custom_style(ctx: &egui::Context, tree_style: &TreeStyle) {
    let mut style = (*ctx.style()).clone();

    // Flat light theme
    let mut visuals = egui::Visuals::light();
    visuals.panel_fill = rgb(tree_style.panel);
    visuals.extreme_bg_color = rgb(tree_style.background);
    visuals.override_text_color = Some(rgb(tree_style.text));
    visuals.selection.bg_fill = rgb(tree_style.selected);

    visuals.widgets.inactive.rounding = egui::Rounding::same(2.0);
    visuals.widgets.hovered.rounding = egui::Rounding::same(2.0);
    visuals.widgets.active.rounding = egui::Rounding::same(2.0);
    visuals.window_shadow = egui::epaint::Shadow::NONE;

    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(6.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);

    ctx.set_style(style);
}

enum RowAction {
    Select(NodeId),
    Toggle(NodeId),
    Reveal(NodeId),
}

struct FolderTreeApp {
    viewer: Viewer,
    style: TreeStyle,
    cjk_font_installed: bool,
}

impl FolderTreeApp {
    fn new(style: TreeStyle) -> Self {
        Self {
            viewer: Viewer::default(),
            style,
            cjk_font_installed: false,
        }
    }

    fn choose_folder(&mut self, ctx: &egui::Context) {
        let Some(folder) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        if let Err(err) = self.viewer.load_root(&folder) {
            tracing::warn!(error = %err, folder = %folder.display(), "Could not load folder");
            return;
        }

        // The CJK font is large, only load it once a name needs it
        if !self.cjk_font_installed && self.viewer.tree().is_some_and(has_cjk_names) {
            self.cjk_font_installed = fonts::install_cjk_fallback(ctx).is_some();
        }
    }

    fn show_tree(&mut self, ui: &mut egui::Ui) {
        let Some(tree) = self.viewer.tree() else {
            ui.centered_and_justified(|ui| {
                ui.label("No folder selected");
            });
            return;
        };

        let rows = tree.visible_rows();
        let selected = self.viewer.selected();
        let style = &self.style;
        let mut action: Option<RowAction> = None;

        ui.spacing_mut().item_spacing.y = 0.0;
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show_rows(ui, style.row_height, rows.len(), |ui, range| {
                for row in &rows[range] {
                    let Some(entry) = tree.entry(row.id) else {
                        continue;
                    };
                    if let Some(row_action) =
                        tree_row(ui, style, entry, *row, selected == Some(row.id))
                    {
                        action = Some(row_action);
                    }
                }
            });

        match action {
            Some(RowAction::Select(id)) => self.viewer.select(id),
            Some(RowAction::Toggle(id)) => {
                self.viewer.select(id);
                self.viewer.toggle(id);
            }
            Some(RowAction::Reveal(id)) => {
                self.viewer.activate(id);
            }
            None => {}
        }
    }
}

fn has_cjk_names(tree: &DirTree) -> bool {
    tree.get_root()
        .descendants(tree.get_arena())
        .filter_map(|id| tree.entry(id))
        .any(|entry| fonts::contains_cjk(&entry.name))
}

/// Draw one tree row and report what the pointer did to it.
fn tree_row(
    ui: &mut egui::Ui,
    style: &TreeStyle,
    entry: &TreeEntry,
    row: VisibleRow,
    is_selected: bool,
) -> Option<RowAction> {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), style.row_height),
        egui::Sense::click(),
    );

    let painter = ui.painter();
    if is_selected {
        painter.rect_filled(rect, 0.0, rgb(style.selected));
    } else if response.hovered() {
        painter.rect_filled(rect, 0.0, HOVER_FILL);
    }

    let arrow_rect = egui::Rect::from_min_size(
        egui::pos2(rect.left() + 4.0 + row.depth as f32 * style.indent, rect.top()),
        egui::vec2(style.indent, rect.height()),
    );
    let font = egui::FontId::proportional(style.font_size);
    let text_color = rgb(style.text);

    if entry.kind.is_folder() {
        let arrow = if entry.open { "▼" } else { "▶" };
        painter.text(
            arrow_rect.center(),
            egui::Align2::CENTER_CENTER,
            arrow,
            egui::FontId::proportional(style.font_size * 0.7),
            text_color,
        );
    }

    painter.text(
        egui::pos2(arrow_rect.right() + 2.0, rect.center().y),
        egui::Align2::LEFT_CENTER,
        format!("{} {}", entry.kind.icon(), entry.name),
        font,
        text_color,
    );

    if response.double_clicked() {
        return Some(RowAction::Reveal(row.id));
    }

    if response.clicked() {
        let on_arrow = response
            .interact_pointer_pos()
            .is_some_and(|pos| arrow_rect.contains(pos));
        if on_arrow && entry.kind.is_folder() {
            return Some(RowAction::Toggle(row.id));
        }
        return Some(RowAction::Select(row.id));
    }

    None
}

fn colored_button(ui: &mut egui::Ui, label: &str, fill: [u8; 3]) -> egui::Response {
    ui.add(
        egui::Button::new(egui::RichText::new(label).color(egui::Color32::WHITE))
            .fill(rgb(fill)),
    )
}

impl eframe::App for FolderTreeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let panel_frame = egui::Frame::none()
            .fill(rgb(self.style.panel))
            .inner_margin(egui::Margin::same(10.0));

        egui::TopBottomPanel::top("top_panel")
            .frame(panel_frame)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if colored_button(ui, "Choose Folder", self.style.choose_button).clicked() {
                        self.choose_folder(ctx);
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let collapse =
                            colored_button(ui, "Collapse All", self.style.collapse_button);
                        if collapse.clicked() {
                            self.viewer.collapse_all();
                        }
                        if colored_button(ui, "Expand All", self.style.expand_button).clicked() {
                            self.viewer.expand_all();
                        }
                    });
                });
            });

        egui::TopBottomPanel::bottom("status_bar")
            .frame(panel_frame.inner_margin(egui::Margin::symmetric(10.0, 4.0)))
            .show(ctx, |ui| {
                ui.label(self.viewer.status());
            });

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(rgb(self.style.background))
                    .inner_margin(egui::Margin::same(4.0)),
            )
            .show(ctx, |ui| {
                self.show_tree(ui);
            });
    }
}
