use crate::{
    models::{file_set::FileSet, options::NormalizedOptions},
    utils::errors::EmptyResult,
};

const IONIC_CSS_IMPORTS: &str = r#"/* Core CSS required for Ionic components to work properly */
import '@ionic/react/css/core.css';

/* Basic CSS for apps built with Ionic */
import '@ionic/react/css/normalize.css';
import '@ionic/react/css/structure.css';
import '@ionic/react/css/typography.css';

/* Optional CSS utils that can be commented out */
import '@ionic/react/css/padding.css';
import '@ionic/react/css/float-elements.css';
import '@ionic/react/css/text-alignment.css';
import '@ionic/react/css/text-transformation.css';
import '@ionic/react/css/flex-utils.css';
import '@ionic/react/css/display.css';
"#;

const IONIC_PAGE_IMPORTS: &str = r#"import {
  IonContent,
  IonHeader,
  IonPage,
  IonTitle,
  IonToolbar,
} from '@ionic/react';"#;

const APP_JSX: &str = r#"<IonApp>
  <IonReactRouter>
    <IonRouterOutlet>
      <Route path="/home" component={Home} exact={true} />
      <Route exact path="/" render={() => <Redirect to="/home" />} />
    </IonRouterOutlet>
  </IonReactRouter>
</IonApp>"#;

const HOME_JSX: &str = r#"<IonPage>
  <IonHeader>
    <IonToolbar>
      <IonTitle>Blank</IonTitle>
    </IonToolbar>
  </IonHeader>
  <IonContent fullscreen>
    <IonHeader collapse="condense">
      <IonToolbar>
        <IonTitle size="large">Blank</IonTitle>
      </IonToolbar>
    </IonHeader>
    <ExploreContainer />
  </IonContent>
</IonPage>"#;

const EXPLORE_CONTAINER_BODY: &str = r#"  <strong>Ready to create an app?</strong>
  <p>
    Start with Ionic{' '}
    <a
      target="_blank"
      rel="noopener noreferrer"
      href="https://ionicframework.com/docs/components"
    >
      UI Components
    </a>
  </p>"#;

const STYLED_CONTAINER: &str = r#"const StyledContainer = styled.div`
  text-align: center;
  position: absolute;
  left: 0;
  right: 0;
  top: 50%;
  transform: translateY(-50%);

  strong {
    font-size: 20px;
    line-height: 26px;
  }

  p {
    font-size: 16px;
    line-height: 22px;
    color: #8c8c8c;
    margin: 0;
  }

  a {
    text-decoration: none;
  }
`;"#;

/// A React component rendered either as a function or as a class.
struct Component<'a> {
    name: &'a str,
    imports: Vec<String>,
    /// TypeScript props interface: name and `field: type` lines
    props: Option<(&'a str, &'a [&'a str])>,
    preamble: Option<&'a str>,
    jsx: String,
}

impl Component<'_> {
    fn render(&self, options: &NormalizedOptions) -> String {
        let typed = !options.options.js;
        let class = options.is_class_component();
        let mut out = String::new();

        if class {
            out.push_str("import React, { Component } from 'react';\n");
        } else {
            out.push_str("import React from 'react';\n");
        }
        for import in &self.imports {
            out.push_str(import);
            out.push('\n');
        }
        out.push('\n');

        if let Some(preamble) = self.preamble {
            out.push_str(preamble);
            out.push_str("\n\n");
        }

        let props_name = match self.props {
            Some((name, fields)) if typed => {
                out.push_str(&format!("export interface {name} {{\n"));
                for field in fields {
                    out.push_str(&format!("  {field};\n"));
                }
                out.push_str("}\n\n");
                Some(name)
            }
            _ => None,
        };

        let name = self.name;
        if class {
            let generic = props_name.map(|p| format!("<{p}>")).unwrap_or_default();
            out.push_str(&format!("export class {name} extends Component{generic} {{\n"));
            out.push_str("  render() {\n");
            out.push_str("    return (\n");
            out.push_str(&indent(&self.jsx, 6));
            out.push_str("\n    );\n");
            out.push_str("  }\n");
            out.push_str("}\n");
        } else {
            let annotation = match (typed, props_name) {
                (true, Some(p)) => format!(": React.FC<{p}>"),
                (true, None) => ": React.FC".to_string(),
                (false, _) => String::new(),
            };
            out.push_str(&format!("export const {name}{annotation} = () => (\n"));
            out.push_str(&indent(&self.jsx, 2));
            out.push_str("\n);\n");
        }

        out.push_str(&format!("\nexport default {name};\n"));
        out
    }
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) fn add_components(options: &NormalizedOptions, files: &mut FileSet) -> EmptyResult {
    let ext = options.component_ext();

    files.add_text(
        options.in_project(&format!("src/app/{}.{ext}", options.app_file_name)),
        app(options).render(options),
    );
    files.add_text(
        options.in_project(&format!("src/app/pages/{}.{ext}", options.home_file_name)),
        home(options).render(options),
    );
    files.add_text(
        options.in_project(&format!(
            "src/app/components/{}.{ext}",
            options.explore_container_file_name
        )),
        explore_container(options).render(options),
    );

    Ok(())
}

fn app(options: &NormalizedOptions) -> Component<'static> {
    let theme_ext = options.style().extension().unwrap_or("css");
    let imports = vec![
        "import { Redirect, Route } from 'react-router-dom';".to_string(),
        "import { IonApp, IonRouterOutlet } from '@ionic/react';".to_string(),
        "import { IonReactRouter } from '@ionic/react-router';".to_string(),
        String::new(),
        format!("import Home from './pages/{}';", options.home_file_name),
        String::new(),
        IONIC_CSS_IMPORTS.trim_end().to_string(),
        String::new(),
        "/* Theme variables */".to_string(),
        format!("import './theme/variables.{theme_ext}';"),
    ];

    Component {
        name: "App",
        imports,
        props: None,
        preamble: None,
        jsx: APP_JSX.to_string(),
    }
}

fn home(options: &NormalizedOptions) -> Component<'static> {
    let mut imports = vec![
        IONIC_PAGE_IMPORTS.to_string(),
        String::new(),
        format!(
            "import ExploreContainer from '../components/{}';",
            options.explore_container_file_name
        ),
    ];
    if let Some(ext) = options.style().extension() {
        imports.push(format!("import './{}.{ext}';", options.home_file_name));
    }

    Component {
        name: "Home",
        imports,
        props: None,
        preamble: None,
        jsx: HOME_JSX.to_string(),
    }
}

fn explore_container(options: &NormalizedOptions) -> Component<'static> {
    let style = options.style();
    let (imports, preamble, tag) = match (style.extension(), style.styled_package()) {
        (Some(ext), _) => (
            vec![format!(
                "import './{}.{ext}';",
                options.explore_container_file_name
            )],
            None,
            ("div className=\"container\"", "div"),
        ),
        (None, Some(package)) => (
            vec![format!("import styled from '{package}';")],
            Some(STYLED_CONTAINER),
            ("StyledContainer", "StyledContainer"),
        ),
        (None, None) => (Vec::new(), None, ("div", "div")),
    };

    let (open, close) = tag;
    Component {
        name: "ExploreContainer",
        imports,
        props: Some(("ExploreContainerProps", &["name?: string"])),
        preamble,
        jsx: format!("<{open}>\n{EXPLORE_CONTAINER_BODY}\n</{close}>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::options::{ApplicationOptions, Style};

    fn generate(options: ApplicationOptions) -> (NormalizedOptions, FileSet) {
        let normalized = options.normalize("apps").unwrap();
        let mut files = FileSet::new();
        add_components(&normalized, &mut files).unwrap();
        (normalized, files)
    }

    #[test]
    fn function_components_in_typescript() {
        let (_, files) = generate(ApplicationOptions::new("demo"));

        let app = files.text("apps/demo/src/app/app.tsx").unwrap();
        assert!(app.starts_with("import React from 'react';\n"));
        assert!(app.contains("export const App: React.FC = () => (\n  <IonApp>"));
        assert!(app.contains("import Home from './pages/home';"));
        assert!(app.contains("import './theme/variables.css';"));
        assert!(app.ends_with("export default App;\n"));

        let explore = files
            .text("apps/demo/src/app/components/explore-container.tsx")
            .unwrap();
        assert!(explore.contains("export interface ExploreContainerProps {\n  name?: string;\n}"));
        assert!(explore.contains("React.FC<ExploreContainerProps>"));
        assert!(explore.contains("import './explore-container.css';"));
        assert!(explore.contains("<div className=\"container\">"));
    }

    #[test]
    fn class_components_render_from_render_method() {
        let mut options = ApplicationOptions::new("demo");
        options.class_component = Some(true);
        let (_, files) = generate(options);

        let home = files.text("apps/demo/src/app/pages/home.tsx").unwrap();
        assert!(home.starts_with("import React, { Component } from 'react';\n"));
        let class_body = concat!(
            "export class Home extends Component {\n",
            "  render() {\n",
            "    return (\n",
            "      <IonPage>",
        );
        assert!(home.contains(class_body));

        let explore = files
            .text("apps/demo/src/app/components/explore-container.tsx")
            .unwrap();
        assert!(explore.contains("extends Component<ExploreContainerProps>"));
    }

    #[test]
    fn javascript_components_have_no_types() {
        let mut options = ApplicationOptions::new("demo");
        options.js = true;
        options.pascal_case_files = Some(true);
        let (_, files) = generate(options);

        let explore = files
            .text("apps/demo/src/app/components/ExploreContainer.js")
            .unwrap();
        assert!(!explore.contains("interface"));
        assert!(explore.contains("export const ExploreContainer = () => ("));
        assert!(explore.contains("import './ExploreContainer.css';"));

        let app = files.text("apps/demo/src/app/App.js").unwrap();
        assert!(app.contains("import Home from './pages/Home';"));
    }

    #[test]
    fn css_in_js_uses_styled_factory() {
        let mut options = ApplicationOptions::new("demo");
        options.style = Style::EmotionStyled;
        let (_, files) = generate(options);

        let explore = files
            .text("apps/demo/src/app/components/explore-container.tsx")
            .unwrap();
        assert!(explore.contains("import styled from '@emotion/styled';"));
        assert!(explore.contains("const StyledContainer = styled.div`"));
        assert!(explore.contains("<StyledContainer>"));
        assert!(explore.contains("</StyledContainer>"));

        let home = files.text("apps/demo/src/app/pages/home.tsx").unwrap();
        assert!(!home.contains("import './home"));
    }

    #[test]
    fn preprocessor_styles_are_imported_with_their_extension() {
        let mut options = ApplicationOptions::new("demo");
        options.style = Style::Less;
        let (_, files) = generate(options);

        let app = files.text("apps/demo/src/app/app.tsx").unwrap();
        assert!(app.contains("import './theme/variables.less';"));
        let home = files.text("apps/demo/src/app/pages/home.tsx").unwrap();
        assert!(home.contains("import './home.less';"));
    }
}
