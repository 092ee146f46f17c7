use anyhow::{Context, Result, bail};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use colourl::{ColourlConfig, Painter, RenderRequest, Renderer, RequestDefaults, Scorer};

const USAGE: &str = "Usage: colourl <page.html|file-url> [--style <name>] [--max <n>] \
[--width <px>] [--height <px>] [--scorer sum|property] [--list] [--out <file>]";

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let mut args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        eprintln!("{USAGE}");
        eprintln!(
            "Styles: {}",
            Painter::ALL.map(|painter| painter.name()).join(", ")
        );
        bail!("missing <page>");
    }
    let page = args.remove(0);

    let config = ColourlConfig::load();
    let mut pairs: Vec<(&str, String)> = vec![("url", page)];
    let mut scorer: Option<Scorer> = None;
    let mut list = false;
    let mut out: Option<PathBuf> = None;
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        let key = match flag {
            "--style" => "style",
            "--max" => "max",
            "--width" => "w",
            "--height" => "h",
            "--scorer" | "--out" => "",
            "--list" => {
                list = true;
                i += 1;
                continue;
            }
            other => bail!("unknown argument '{other}'\n{USAGE}"),
        };
        let Some(value) = args.get(i + 1) else {
            bail!("{flag} expects a value");
        };
        match flag {
            "--scorer" => {
                scorer = Some(
                    Scorer::from_name(value)
                        .with_context(|| format!("unknown scorer '{value}'"))?,
                );
            }
            "--out" => out = Some(PathBuf::from(value)),
            _ => pairs.push((key, value.clone())),
        }
        i += 2;
    }

    let defaults = RequestDefaults::from_config(&config.render);
    let request = RenderRequest::from_pairs_with(
        pairs.iter().map(|(key, value)| (*key, value.as_str())),
        &defaults,
    )?;
    let mut renderer = Renderer::from_config(&config);
    if let Some(scorer) = scorer {
        renderer = renderer.with_scorer(scorer);
    }

    if list {
        let palette = renderer.palette(&request.url)?;
        print!("{palette}");
        return Ok(());
    }

    let svg = renderer.render(&request)?;
    match out {
        Some(path) => fs::write(&path, &svg)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout()
            .lock()
            .write_all(&svg)
            .context("failed to write SVG to stdout")?,
    }
    Ok(())
}
