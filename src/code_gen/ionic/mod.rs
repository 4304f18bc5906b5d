use serde_json::json;

use crate::{
    code_gen::{
        gen_iface::CodeGenTrait,
        template::{TemplateUtils, TemplateVars},
    },
    models::{file_set::FileSet, options::NormalizedOptions},
    utils::errors::EmptyResult,
};

mod assets;
mod components;
mod styles;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>{{class_name}}</title>

    <base href="/" />

    <meta name="color-scheme" content="light dark" />
    <meta
      name="viewport"
      content="viewport-fit=cover, width=device-width, initial-scale=1.0, minimum-scale=1.0, maximum-scale=1.0, user-scalable=no"
    />
    <meta name="format-detection" content="telephone=no" />
    <meta name="msapplication-tap-highlight" content="no" />

    <link rel="manifest" href="manifest.json" />
    <link rel="shortcut icon" type="image/png" href="assets/icon/favicon.png" />

    <!-- add to homescreen for ios -->
    <meta name="apple-mobile-web-app-capable" content="yes" />
    <meta name="apple-mobile-web-app-title" content="{{class_name}}" />
    <meta name="apple-mobile-web-app-status-bar-style" content="black" />
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

/// Ionic layer: app shell, pages, components, theme, PWA manifest and icons.
pub struct GenIonic;

impl CodeGenTrait for GenIonic {
    fn name(&self) -> &'static str {
        "ionic"
    }

    fn run(&self, options: &NormalizedOptions, files: &mut FileSet) -> EmptyResult {
        let vars = TemplateVars::from_options(options);

        files.add_text(
            options.in_project("src/index.html"),
            TemplateUtils::render(INDEX_HTML, &vars)?,
        );
        files.add_json(options.in_project("ionic.config.json"), &Self::ionic_config(options))?;
        files.add_json(options.in_project("src/manifest.json"), &Self::manifest(options))?;

        assets::add_icons(options, files)?;
        components::add_components(options, files)?;
        styles::add_styles(options, files);

        Ok(())
    }
}

impl GenIonic {
    fn ionic_config(options: &NormalizedOptions) -> serde_json::Value {
        let integrations = if options.options.capacitor {
            json!({ "capacitor": {} })
        } else {
            json!({})
        };

        json!({
            "name": options.project_name,
            "integrations": integrations,
            "type": "react"
        })
    }

    fn manifest(options: &NormalizedOptions) -> serde_json::Value {
        json!({
            "short_name": options.class_name,
            "name": options.class_name,
            "icons": [
                {
                    "src": "assets/icon/favicon.png",
                    "sizes": "64x64 32x32 24x24 16x16",
                    "type": "image/x-icon"
                },
                {
                    "src": "assets/icon/icon.png",
                    "type": "image/png",
                    "sizes": "512x512",
                    "purpose": "maskable"
                }
            ],
            "start_url": ".",
            "display": "standalone",
            "theme_color": "#ffffff",
            "background_color": "#ffffff"
        })
    }
}
