//! Control Panel Widget
//! Left side panel with the product, site and incidence column selectors.

use crate::data::{GenderColumn, Selection};
use egui::{Color32, ComboBox, RichText, ScrollArea};

/// Left side control panel with selection widgets and export.
pub struct ControlPanel {
    pub products: Vec<String>,
    pub selected_products: Vec<bool>,
    pub sites: Vec<String>,
    pub site: String,
    pub gender: GenderColumn,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            selected_products: Vec::new(),
            sites: Vec::new(),
            site: String::new(),
            gender: GenderColumn::default(),
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new(gender: GenderColumn) -> Self {
        Self {
            gender,
            ..Self::default()
        }
    }

    /// Replace the available options after the source tables are loaded.
    /// No product starts selected; the first site is preselected.
    pub fn update_options(&mut self, products: Vec<String>, sites: Vec<String>) {
        self.selected_products = vec![false; products.len()];
        self.products = products;
        self.site = sites.first().cloned().unwrap_or_default();
        self.sites = sites;
    }

    /// Current selection as pipeline input.
    pub fn selection(&self) -> Selection {
        let products = self
            .products
            .iter()
            .zip(self.selected_products.iter())
            .filter(|(_, &selected)| selected)
            .map(|(product, _)| product.clone());
        Selection::new(products, self.site.clone(), self.gender)
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚬 Prices & Cancer")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Tobacco / alcohol prices vs. incidence")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Products =====
        ui.label(RichText::new("🛒 Products").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("products")
                    .max_height(220.0)
                    .show(ui, |ui| {
                        for (product, selected) in
                            self.products.iter().zip(self.selected_products.iter_mut())
                        {
                            if ui.checkbox(selected, product).changed() {
                                action = ControlPanelAction::SelectionChanged;
                            }
                        }
                    });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                self.selected_products.iter_mut().for_each(|v| *v = true);
                action = ControlPanelAction::SelectionChanged;
            }
            if ui.small_button("Clear All").clicked() {
                self.selected_products.iter_mut().for_each(|v| *v = false);
                action = ControlPanelAction::SelectionChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Site & incidence column =====
        ui.label(RichText::new("🔧 Incidence").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 90.0;
        let combo_width = 170.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Cancer site:"));
            ComboBox::from_id_salt("site")
                .width(combo_width)
                .selected_text(&self.site)
                .show_ui(ui, |ui| {
                    for site in &self.sites {
                        if ui.selectable_label(self.site == *site, site).clicked()
                            && self.site != *site
                        {
                            self.site = site.clone();
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Show:"));
            ComboBox::from_id_salt("gender")
                .width(combo_width)
                .selected_text(self.gender.label())
                .show_ui(ui, |ui| {
                    for gender in GenderColumn::ALL {
                        if ui
                            .selectable_label(self.gender == gender, gender.label())
                            .clicked()
                            && self.gender != gender
                        {
                            self.gender = gender;
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Drop a stale error message once an operation succeeds again.
    pub fn clear_error(&mut self) {
        if self.status.starts_with("Error") {
            self.status = "Ready".to_string();
        }
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    ExportPng,
}
