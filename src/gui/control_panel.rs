//! Control Panel Widget
//! Left side panel with the file upload control and page navigation.

use egui::{Color32, RichText};

/// Page shown in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Filter,
    Visualize,
    Preprocess,
    Summary,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Filter, Page::Visualize, Page::Preprocess, Page::Summary];

    pub fn label(self) -> &'static str {
        match self {
            Page::Filter => "🔍 Filter Data",
            Page::Visualize => "📈 Visualize Data",
            Page::Preprocess => "🧹 Data Preprocessing",
            Page::Summary => "📊 Data Summary",
        }
    }
}

/// Left side control panel with file selection and navigation.
pub struct ControlPanel {
    pub page: Page,
    pub file_name: Option<String>,
    pub status: String,
    pub has_data: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            page: Page::default(),
            file_name: None,
            status: "Ready".to_string(),
            has_data: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, is_loading: bool) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📂 CSV Explorer")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Upload Section =====
        ui.label(RichText::new("📁 Upload your CSV file").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let name = self
                        .file_name
                        .clone()
                        .unwrap_or_else(|| "No file selected".to_string());

                    let color = if self.file_name.is_some() {
                        ui.visuals().text_color()
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(name).size(12.0).color(color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(!is_loading, |ui| {
                            if ui.button("📂 Browse").clicked() {
                                action = ControlPanelAction::BrowseCsv;
                            }
                        });
                    });
                });
                ui.label(
                    RichText::new("or drop a .csv file onto the window")
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            });

        if is_loading {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading...");
            });
        }

        // ===== Navigation =====
        if self.has_data {
            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.label(RichText::new("Begin Your Exploration 👀").size(14.0).strong());
            ui.add_space(5.0);
            ui.label("Go to:");
            for page in Page::ALL {
                if ui.radio_value(&mut self.page, page, page.label()).changed() {
                    action = ControlPanelAction::PageChanged;
                }
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    PageChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_are_distinct_and_start_on_filter() {
        assert_eq!(ControlPanel::new().page, Page::Filter);
        let labels: std::collections::HashSet<_> = Page::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels.len(), 4);
    }
}
