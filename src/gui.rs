use crate::progress::{LoadEvent, Reveal};
use crate::registry::Category;
use crate::session::CityEditor;
use crate::statics;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::path::PathBuf;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x00, 0xFF, 0xAA);

pub fn run_gui() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(statics::WINDOW_SIZE),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(CneApp {
                theme_dark: true,
                ..Default::default()
            }))
        }),
    )
}

/// The main application state and GUI logic.
/// Owns the editor (document + registry) and the purely cosmetic load chrome.
#[derive(Default)]
struct CneApp {
    editor: CityEditor,
    dialog_dir: Option<PathBuf>,
    status: String,
    last_error: Option<String>,

    // Load chrome: progress bar + city-name reveal.
    progress: f32,
    progress_text: String,
    reveal: Option<Reveal>,

    // Bumped on every successful load so collapse state and scroll offset reset.
    generation: u64,

    about_open: bool,
    theme_dark: bool,
}

impl CneApp {
    fn file_dialog(&self) -> rfd::FileDialog {
        let mut dlg =
            rfd::FileDialog::new().add_filter(statics::EN_DIALOG_FILTER, statics::EN_DIALOG_EXTENSIONS);

        if let Some(dir) = self.dialog_dir.clone() {
            dlg = dlg.set_directory(dir);
        }

        dlg
    }

    fn open_file(&mut self) {
        let Some(path) = self.file_dialog().pick_file() else {
            return;
        };

        match self.editor.begin_load(path.clone()) {
            Ok(()) => {
                self.dialog_dir = path.parent().map(PathBuf::from);
                self.progress = 0.0;
                self.progress_text = statics::EN_PROGRESS_LOADING.to_string();
                self.reveal = None;
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(format!("{} {e:#}", statics::EN_ERR_LOAD));
            }
        }
    }

    fn save_file_as(&mut self) {
        let mut dlg = self.file_dialog();
        if let Some(session) = self.editor.session()
            && let Some(source_path) = session.city.source_path.as_ref()
            && let Some(file_name) = source_path.file_name()
        {
            dlg = dlg.set_file_name(file_name.to_string_lossy());
        }

        let Some(path) = dlg.save_file() else {
            return;
        };

        if let Err(e) = self.editor.save_to_path(&path) {
            self.last_error = Some(format!("{} {:#}", statics::EN_ERR_SAVE, anyhow::Error::new(e)));
        } else {
            self.dialog_dir = path.parent().map(PathBuf::from);
            self.status = format!("{} {}", statics::EN_STATUS_SAVED, path.display());
            self.last_error = None;
        }
    }

    fn apply_load_events(&mut self, ctx: &egui::Context) {
        for event in self.editor.poll() {
            match event {
                LoadEvent::Progress { percent, status } => {
                    self.progress = percent;
                    self.progress_text = status.to_string();
                }
                LoadEvent::CityName(name) => {
                    self.reveal = Some(Reveal::new(&name));
                }
                LoadEvent::Finished(Ok(path)) => {
                    self.generation += 1;
                    self.status = format!("{} {}", statics::EN_STATUS_LOADED, path.display());
                    self.last_error = None;
                }
                LoadEvent::Finished(Err(e)) => {
                    self.progress = 0.0;
                    self.progress_text.clear();
                    self.reveal = None;
                    self.last_error =
                        Some(format!("{} {:#}", statics::EN_ERR_LOAD, anyhow::Error::new(e)));
                }
            }
        }

        if self.editor.is_busy() {
            ctx.request_repaint_after(Reveal::step());
        }

        if let Some(reveal) = self.reveal.as_mut()
            && !reveal.is_done()
        {
            reveal.advance(std::time::Duration::from_secs_f32(ctx.input(|i| i.stable_dt)));
            ctx.request_repaint_after(Reveal::step());
        }
    }

    fn render_load_chrome(&self, ui: &mut egui::Ui) {
        let shown = self.reveal.as_ref().map(Reveal::visible).unwrap_or(statics::EN_EMPTY);
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(shown)
                    .monospace()
                    .size(20.0)
                    .strong()
                    .color(ACCENT),
            );
        });

        let text = match self.reveal.as_ref() {
            Some(reveal) if !reveal.is_done() => {
                format!("{} {}", statics::EN_PROGRESS_REVEAL_PREFIX, reveal.visible())
            }
            _ => format!("{} ({:.0}%)", self.progress_text, self.progress),
        };
        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .fill(ACCENT)
                .text(egui::RichText::new(text).color(egui::Color32::from_gray(0x22))),
        );
    }

    fn render_category(ui: &mut egui::Ui, generation: u64, idx: usize, category: &mut Category) {
        let modified = category.entries.iter().filter(|e| e.is_modified()).count();
        let header = if modified > 0 {
            format!("{} ({} {modified})", category.label, statics::EN_BADGE_MODIFIED)
        } else {
            category.label.clone()
        };

        egui::CollapsingHeader::new(egui::RichText::new(header).strong())
            .id_salt(("category", generation, idx))
            .default_open(false)
            .show(ui, |ui| {
                if category.entries.is_empty() {
                    ui.weak(statics::EN_NO_ENTRIES);
                    return;
                }
                ui.push_id(("entries", idx), |ui| {
                    Self::render_entry_table(ui, category);
                });
            });
    }

    fn render_entry_table(ui: &mut egui::Ui, category: &mut Category) {
        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::exact(statics::ENTRY_LABEL_WIDTH))
            .column(Column::remainder())
            .column(Column::auto())
            .body(|mut body| {
                for entry in category.entries.iter_mut() {
                    body.row(row_h, |mut row| {
                        row.col(|ui| {
                            ui.strong(&entry.label);
                        });
                        row.col(|ui| {
                            let response = ui.add(
                                egui::TextEdit::singleline(&mut entry.text)
                                    .font(egui::TextStyle::Monospace)
                                    .desired_width(ui.available_width()),
                            );
                            if response.changed() {
                                entry.edited = true;
                            }
                        });
                        row.col(|ui| {
                            ui.weak(format!("{} {}", entry.refs.len(), statics::EN_LABEL_REFS));
                        });
                    });
                }
            });
    }
}

impl eframe::App for CneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_load_events(ctx);

        let busy = self.editor.is_busy();
        let has_session = self.editor.session().is_some();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui
                    .add_enabled(!busy, egui::Button::new(statics::EN_BTN_OPEN))
                    .clicked()
                {
                    self.open_file();
                }

                if ui
                    .add_enabled(has_session && !busy, egui::Button::new(statics::EN_BTN_SAVE_AS))
                    .clicked()
                {
                    self.save_file_as();
                }

                if ui.button(statics::EN_BTN_ABOUT).clicked() {
                    self.about_open = true;
                }

                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    if self.theme_dark {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                }

                if let Some(session) = self.editor.session() {
                    let modified = session.registry.modified_count();
                    if modified > 0 {
                        ui.separator();
                        ui.colored_label(
                            egui::Color32::YELLOW,
                            format!("{} {modified}", statics::EN_BADGE_MODIFIED),
                        );
                    }
                }

                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });

        if self.about_open {
            let mut open = self.about_open;
            egui::Window::new(statics::EN_WINDOW_ABOUT)
                .collapsible(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.heading(statics::EN_ABOUT_HEADING);
                    ui.label(format!(
                        "{} {}",
                        statics::EN_ABOUT_VERSION,
                        env!("CARGO_PKG_VERSION")
                    ));
                    ui.separator();
                    ui.label(statics::EN_ABOUT_BLURB);
                });
            self.about_open = open;
        }

        if let Some(err) = self.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, err);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                            self.last_error = None;
                        }
                    });
                });
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_load_chrome(ui);
            ui.add_space(8.0);

            let generation = self.generation;
            let Some(session) = self.editor.session_mut() else {
                if !busy {
                    ui.label(statics::EN_HOME_INSTRUCTIONS);
                }
                return;
            };

            egui::ScrollArea::vertical()
                .id_salt(("categories", generation))
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for (idx, category) in session.registry.categories.iter_mut().enumerate() {
                        Self::render_category(ui, generation, idx, category);
                    }
                });
        });
    }
}
