use crate::models::{file_set::FileSet, options::NormalizedOptions};

const HOME_STYLES: &str = "ion-content {\n  --background: var(--ion-color-light);\n}\n";

const EXPLORE_CONTAINER_STYLES: &str = r#".container {
  text-align: center;
  position: absolute;
  left: 0;
  right: 0;
  top: 50%;
  transform: translateY(-50%);
}

.container strong {
  font-size: 20px;
  line-height: 26px;
}

.container p {
  font-size: 16px;
  line-height: 22px;
  color: #8c8c8c;
  margin: 0;
}

.container a {
  text-decoration: none;
}
"#;

// name, base, contrast, shade, tint
const PALETTE: [(&str, &str, &str, &str, &str); 9] = [
    ("primary", "#3880ff", "#ffffff", "#3171e0", "#4c8dff"),
    ("secondary", "#3dc2ff", "#ffffff", "#36abe0", "#50c8ff"),
    ("tertiary", "#5260ff", "#ffffff", "#4854e0", "#6370ff"),
    ("success", "#2dd36f", "#ffffff", "#28ba62", "#42d77d"),
    ("warning", "#ffc409", "#000000", "#e0ac08", "#ffca22"),
    ("danger", "#eb445a", "#ffffff", "#cf3c4f", "#ed576b"),
    ("dark", "#222428", "#ffffff", "#1e2023", "#383a3e"),
    ("medium", "#92949c", "#ffffff", "#808289", "#9d9fa6"),
    ("light", "#f4f5f8", "#000000", "#d7d8da", "#f5f6f9"),
];

/// Ionic color custom properties. Valid in every supported style language.
fn theme_variables() -> String {
    let mut out = String::new();
    out.push_str("/* Ionic Variables and Theming. For more info, please see:\n");
    out.push_str("http://ionicframework.com/docs/theming/ */\n\n");
    out.push_str("/** Ionic CSS Variables **/\n:root {\n");

    for (index, (name, base, contrast, shade, tint)) in PALETTE.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&format!("  /** {name} **/\n"));
        out.push_str(&format!("  --ion-color-{name}: {base};\n"));
        out.push_str(&format!("  --ion-color-{name}-rgb: {};\n", rgb(base)));
        out.push_str(&format!("  --ion-color-{name}-contrast: {contrast};\n"));
        out.push_str(&format!(
            "  --ion-color-{name}-contrast-rgb: {};\n",
            rgb(contrast)
        ));
        out.push_str(&format!("  --ion-color-{name}-shade: {shade};\n"));
        out.push_str(&format!("  --ion-color-{name}-tint: {tint};\n"));
    }

    out.push_str("}\n");
    out
}

/// `#3880ff` becomes `56, 128, 255`.
fn rgb(hex: &str) -> String {
    let hex = hex.trim_start_matches('#');
    (0..3)
        .map(|i| {
            hex.get(i * 2..i * 2 + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .unwrap_or(0)
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub(super) fn add_styles(options: &NormalizedOptions, files: &mut FileSet) {
    let Some(ext) = options.style().extension() else {
        // CSS-in-JS keeps Ionic's theme in plain CSS custom properties.
        files.add_text(
            options.in_project("src/app/theme/variables.css"),
            theme_variables(),
        );
        return;
    };

    files.add_text(
        options.in_project(&format!("src/app/theme/variables.{ext}")),
        theme_variables(),
    );
    files.add_text(
        options.in_project(&format!("src/app/pages/{}.{ext}", options.home_file_name)),
        HOME_STYLES,
    );
    files.add_text(
        options.in_project(&format!(
            "src/app/components/{}.{ext}",
            options.explore_container_file_name
        )),
        EXPLORE_CONTAINER_STYLES,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::options::{ApplicationOptions, Style};

    #[test]
    fn converts_hex_colors() {
        assert_eq!(rgb("#3880ff"), "56, 128, 255");
        assert_eq!(rgb("#000000"), "0, 0, 0");
    }

    #[test]
    fn theme_lists_every_palette_color() {
        let theme = theme_variables();
        for (name, ..) in PALETTE {
            assert!(theme.contains(&format!("--ion-color-{name}:")));
        }
        assert!(theme.contains("--ion-color-primary-rgb: 56, 128, 255;"));
    }

    #[test]
    fn style_sheets_use_the_style_extension() {
        let mut options = ApplicationOptions::new("demo");
        options.style = Style::Scss;
        options.pascal_case_files = Some(true);
        let normalized = options.normalize("apps").unwrap();
        let mut files = FileSet::new();
        add_styles(&normalized, &mut files);

        let paths: Vec<_> = files.paths().collect();
        assert_eq!(
            paths,
            vec![
                "apps/demo/src/app/components/ExploreContainer.scss",
                "apps/demo/src/app/pages/Home.scss",
                "apps/demo/src/app/theme/variables.scss",
            ]
        );
    }
}
