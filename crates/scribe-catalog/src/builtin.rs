//! Stock language-server definitions.
//!
//! One entry per supported server, carrying the launch argv, the
//! scope/syntax matching rows, and the default settings payloads the host
//! sends after the handshake. Bundled server scripts are resolved against
//! the `server_dir` the host passes in; commands such as `node` or `java`
//! are expected on the search path and verified by the launch guard.

use std::path::Path;

use serde_json::json;

use scribe_toolchain::ManagerProfile;

use crate::server::{LanguageScope, ServerConfig};

/// Builds the stock server definitions.
#[must_use]
pub fn builtin_configs(server_dir: &Path) -> Vec<ServerConfig> {
    let script = |file: &str| server_dir.join(file).display().to_string();

    vec![
        ServerConfig::new("css", "CSS Language Server", "node")
            .arg(script("css-languageserver.js"))
            .arg("--stdio")
            .language(LanguageScope::new("css", ["source.css"], ["css"]))
            .language(LanguageScope::new("scss", ["source.scss"], ["scss"]))
            .language(LanguageScope::new("sass", ["source.sass"], ["sass"]))
            .language(LanguageScope::new("less", ["source.less"], ["less"])),
        ServerConfig::new("typescript", "TypeScript Language Server", "node")
            .arg(script("javascript-typescript-langserver.js"))
            .args(["-t", "--logfile", "~/.lsp/typescript.log"])
            .language(LanguageScope::new(
                "typescript",
                ["source.ts", "source.tsx"],
                ["typescript"],
            ))
            .language(LanguageScope::new(
                "javascript",
                ["source.js", "source.jsx"],
                ["javascript"],
            ))
            .settings(json!({
                "globalPlugins": ["tslint-language-service.js"],
            })),
        ServerConfig::new("flow", "Flow Language Server", "node")
            .arg(script("flow-language-server.js"))
            .arg("--stdio")
            .language(LanguageScope::new(
                "flow",
                ["source.js", "source.jsx"],
                ["javascript"],
            )),
        ServerConfig::new("python", "Python Language Server", "python3")
            .arg(script("pyls.py"))
            .args(["-v", "--log-file", "~/.lsp/pyls.log"])
            .language(LanguageScope::new("python", ["source.python"], ["python"]))
            .settings(json!({
                "pyls": {
                    "configurationSources": ["flake8"],
                    "extraSysPath": [],
                },
            })),
        ServerConfig::new("rust", "Rust Language Server", "rustup")
            .args(["run", "nightly", "rls"])
            .language(LanguageScope::new("rust", ["source.rust"], ["rust"]))
            .provisioned_by(ManagerProfile::rust_default()),
        ServerConfig::new("java", "Java Language Server", "java")
            .arg("-jar")
            .arg(script("plugins/org.eclipse.equinox.launcher.jar"))
            .arg("-configuration")
            .arg(script(platform_config_dir()))
            .language(LanguageScope::new("java", ["source.java"], ["java"])),
        ServerConfig::new("scala", "Scala Language Server", "java")
            .arg("-jar")
            .arg(script("coursier"))
            .args(["launch", "--cache"])
            .arg(server_dir.display().to_string())
            .args([
                "ch.epfl.lamp:dotty-language-server_0.8:0.8.0",
                "-M",
                "dotty.tools.languageserver.Main",
                "--",
                "-stdio",
            ])
            .language(LanguageScope::new("scala", ["source.scala"], ["scala"])),
        ServerConfig::new("php", "PHP Language Server", "node")
            .arg(script("intelephense-server.js"))
            .arg("--stdio")
            .language(LanguageScope::new(
                "php",
                ["source.php", "embedding.php text.html.basic"],
                ["php"],
            ))
            .init_options(json!({
                "storagePath": "/tmp/.lsp/intelephense",
            })),
        ServerConfig::new("vue", "Vue Language Server", "node")
            .arg(script("vue-language-server.js"))
            .language(LanguageScope::new("vue", ["text.html.vue"], ["vue"])),
        ServerConfig::new("cpp", "C/C++ Language Server", "cquery")
            .args(["--log-file", "~/.lsp/cquery.log"])
            .language(LanguageScope::new("c", ["source.c"], ["c"]))
            .language(LanguageScope::new("c++", ["source.c++"], ["c++"]))
            .language(LanguageScope::new("objc", ["source.objc"], ["Objective-C"]))
            .language(LanguageScope::new(
                "objc++",
                ["source.objc++"],
                ["Objective-C++"],
            ))
            .init_options(json!({
                "cacheDirectory": index_cache_dir(),
                "extraClangArguments": [
                    "-Wno-inconsistent-missing-override",
                    "-Wno-format",
                    "-Wno-extern-c-compat",
                ],
            })),
        ServerConfig::new("html", "HTML Language Server", "node")
            .arg(script("html-languageserver.js"))
            .arg("--stdio")
            .language(LanguageScope::new("html", ["text.html.basic"], ["html"])),
        ServerConfig::new("json", "JSON Language Server", "node")
            .arg(script("vscode-json-languageserver.js"))
            .arg("--stdio")
            .language(LanguageScope::new("json", ["source.json"], ["json"]))
            .language(LanguageScope::new("jsonc", ["source.json.sublime"], ["jsonc"])),
        ServerConfig::new("markdown", "Markdown Language Server", "node")
            .arg(script("markdown-language-server.js"))
            .arg("--stdio")
            .language(LanguageScope::new(
                "markdown",
                ["text.html.markdown"],
                ["markdown"],
            )),
    ]
}

/// Platform-specific configuration directory for the Java server bundle.
const fn platform_config_dir() -> &'static str {
    if cfg!(target_os = "macos") {
        "config_mac"
    } else if cfg!(windows) {
        "config_win"
    } else {
        "config_linux"
    }
}

/// Index cache directory for the C/C++ server, under the operator's home
/// directory when one can be determined.
fn index_cache_dir() -> String {
    dirs::home_dir().map_or_else(
        || String::from("~/.lsp/cquery"),
        |home| home.join(".lsp").join("cquery").display().to_string(),
    )
}
