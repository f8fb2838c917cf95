//! Debug overlay built with egui.

use glam::Vec3;
use meshview::Model;

use crate::AppState;

/// Build the debug window content for one frame
pub fn build_debug_ui(ctx: &egui::Context, state: &mut AppState, model: &Model) {
    egui::Window::new("Debug")
        .default_pos([10.0, 10.0])
        .default_size([260.0, 520.0])
        .show(ctx, |ui| {
            // Performance section
            ui.heading("Performance");
            ui.label(format!("FPS: {:.1}", state.fps));
            ui.label(format!(
                "Frame time: {:.2} ms",
                if state.fps > 0.0 { 1000.0 / state.fps } else { 0.0 }
            ));
            ui.separator();

            // Model info
            ui.heading("Model");
            ui.label(format!("Name: {}", model.name()));
            ui.label(format!("Meshes: {}", model.meshes().len()));
            ui.label(format!("Vertices: {}", model.vertex_count()));
            ui.label(format!("Triangles: {}", model.triangle_count()));
            ui.separator();

            // Camera info
            ui.heading("Camera");
            let pos = state.camera.position;
            ui.label(format!(
                "Position: ({:.1}, {:.1}, {:.1})",
                pos.x, pos.y, pos.z
            ));
            ui.label(format!("FOV: {:.1} deg", state.camera.fov_degrees()));
            ui.separator();

            // Light editors. The shader normalizes the direction per
            // fragment, so raw component edits are fine.
            ui.heading("Lighting");
            ui.label("Directional");
            ui.add(egui::Slider::new(&mut state.dir_light.direction.x, -1.0..=1.0).text("dir x"));
            ui.add(egui::Slider::new(&mut state.dir_light.direction.y, -1.0..=1.0).text("dir y"));
            ui.add(egui::Slider::new(&mut state.dir_light.direction.z, -1.0..=1.0).text("dir z"));
            color_row(ui, "Ambient", &mut state.dir_light.ambient);
            color_row(ui, "Diffuse", &mut state.dir_light.diffuse);
            color_row(ui, "Specular", &mut state.dir_light.specular);

            ui.add_space(4.0);
            ui.label("Point");
            ui.add(egui::Slider::new(&mut state.point_light.position.x, -5.0..=5.0).text("x"));
            ui.add(egui::Slider::new(&mut state.point_light.position.y, -5.0..=5.0).text("y"));
            ui.add(egui::Slider::new(&mut state.point_light.position.z, -5.0..=5.0).text("z"));
            color_row(ui, "Ambient", &mut state.point_light.ambient);
            color_row(ui, "Diffuse", &mut state.point_light.diffuse);
            color_row(ui, "Specular", &mut state.point_light.specular);
            ui.add(egui::Slider::new(&mut state.point_light.linear, 0.0..=0.7).text("linear"));
            ui.add(
                egui::Slider::new(&mut state.point_light.quadratic, 0.0..=1.8).text("quadratic"),
            );
            ui.separator();

            // Material
            ui.heading("Material");
            ui.add(
                egui::Slider::new(&mut state.shininess, 1.0..=256.0)
                    .logarithmic(true)
                    .text("shininess"),
            );
            ui.separator();

            // Render toggles
            ui.heading("Rendering");
            ui.checkbox(&mut state.wireframe, "Wireframe");
            ui.checkbox(&mut state.auto_rotate, "Auto-rotate");
            ui.separator();

            // Controls hint
            ui.heading("Controls");
            ui.label("WASD - Move");
            ui.label("Space/Shift - Up/Down");
            ui.label("RMB + Mouse - Look");
            ui.label("Scroll - Zoom");
            ui.label("F1 - Toggle this UI");
        });
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Vec3) {
    ui.horizontal(|ui| {
        let mut rgb = color.to_array();
        if ui.color_edit_button_rgb(&mut rgb).changed() {
            *color = Vec3::from_array(rgb);
        }
        ui.label(label);
    });
}
