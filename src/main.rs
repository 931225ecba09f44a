use clap::{Parser, Subcommand};
use leather_catalog::config::{self, CatalogConfig};
use leather_catalog::loader::{LoadedPage, ProductLoader};
use leather_catalog::render::{self, RenderContext};
use leather_catalog::session::Session;
use leather_catalog::source::{DirSource, HttpSource, Source, is_remote};
use leather_catalog::{category, output, scaffold};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; clap needs a static string
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

/// Selects which catalog page to load.
#[derive(clap::Args, Clone)]
struct PageArgs {
    /// Catalog page location, e.g. "/productos?categoria=Bolsos"
    #[arg(long, conflicts_with = "category")]
    url: Option<String>,

    /// Category to show (default: all categories)
    #[arg(long)]
    category: Option<String>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

#[derive(Parser)]
#[command(name = "leather-catalog")]
#[command(about = "Browse, render and scaffold a manifest-driven product catalog")]
#[command(long_about = "\
Browse, render and scaffold a manifest-driven product catalog

The catalog is a static site: manifest.json lists product folders per
category, and every product folder holds a metadata.txt next to its media.

Site structure:

  public/
  ├── manifest.json                    # {\"Bolsos\": [\"Bolso London\", ...], ...}
  └── images/Categorias/
      └── Bolsos/
          └── Bolso London/
              ├── metadata.txt         # title: ..., images: 01.jpg, 02.jpg
              ├── 01.jpg
              └── giro.mp4

metadata.txt keys (all optional):
  title, subtitle, description, code      single values
  images, videos                          comma-separated file names

Run 'leather-catalog gen-config' to generate a documented catalog.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site root: a directory or an http(s) URL (default: site_root from config)
    #[arg(long, global = true)]
    root: Option<String>,

    /// Config file (default: ./catalog.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the categories in the manifest
    Categories,
    /// Load one catalog page and list its products
    Page(PageArgs),
    /// Render one catalog page as a standalone HTML file
    Render {
        #[command(flatten)]
        page: PageArgs,
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write missing metadata.txt files and regenerate manifest.json
    Scaffold {
        /// Directory holding one folder per category
        categories_dir: PathBuf,
        /// Where to write the manifest
        #[arg(long, default_value = "manifest.json")]
        manifest: PathBuf,
    },
    /// Print a stock catalog.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(Path::new("."))?,
    };
    let root = cli.root.clone().unwrap_or_else(|| config.site_root.clone());

    match cli.command {
        Command::Categories => {
            let mut loader = ProductLoader::new(open_source(&root), config.loader_options());
            match loader.manifest() {
                Ok(manifest) => output::print_categories(manifest),
                Err(e) => {
                    log::error!("{e}");
                    output::print_categories(&Default::default());
                }
            }
        }
        Command::Page(args) => {
            let mut session = open_session(&root, &config, &args)?;
            let page = load_or_empty(&mut session, args.page);
            output::print_page(&page, session.pagination(), session.category());
        }
        Command::Render { page: args, out } => {
            let mut session = open_session(&root, &config, &args)?;
            let page = load_or_empty(&mut session, args.page);
            let categories = session.loader_mut().categories().unwrap_or_default();
            let ctx = RenderContext {
                site_title: "Catálogo",
                base_folder: &config.base_folder,
                catalog_path: &config.catalog_path,
                category_param: &config.category_param,
                categories: &categories,
                current_category: session.category(),
            };
            let html = render::render_catalog_page(&page, session.pagination(), &ctx).into_string();
            match out {
                Some(path) => {
                    std::fs::write(&path, html)?;
                    println!("Rendered page {} → {}", args.page, path.display());
                }
                None => print!("{html}"),
            }
        }
        Command::Scaffold {
            categories_dir,
            manifest,
        } => {
            println!("==> Scaffolding {}", categories_dir.display());
            let report =
                scaffold::scaffold_and_write(&categories_dir, &config.metadata_file, &manifest)?;
            output::print_scaffold(&report);
            println!("==> Manifest written: {}", manifest.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn open_source(root: &str) -> Box<dyn Source> {
    if is_remote(root) {
        Box::new(HttpSource::new(root))
    } else {
        Box::new(DirSource::new(root))
    }
}

fn open_session(
    root: &str,
    config: &CatalogConfig,
    args: &PageArgs,
) -> Result<Session<Box<dyn Source>>, url::ParseError> {
    let location = match (&args.url, &args.category) {
        (Some(url), _) => url.clone(),
        (None, category) => category::catalog_location(
            &config.catalog_path,
            &config.category_param,
            category.as_deref(),
        ),
    };
    let loader = ProductLoader::new(open_source(root), config.loader_options());
    Session::from_location(loader, config.category_param.clone(), &location)
}

/// Load a page, turning a manifest failure into the empty "no products" state.
fn load_or_empty(session: &mut Session<Box<dyn Source>>, page: u32) -> LoadedPage {
    match session.open_page(page) {
        Ok(loaded) => loaded.clone(),
        Err(e) => {
            log::error!("{e}");
            LoadedPage {
                page,
                entries: Vec::new(),
                total_count: 0,
                warnings: Vec::new(),
            }
        }
    }
}
