use rayon::prelude::*;
use std::{
    fs::File,
    io::{BufRead as _, BufReader, BufWriter, Write as _},
    time::Instant,
};
use wiki_flatten::{
    config::{CONFIG, Configuration},
    pages::{self, Page, RenderedPage},
    renderer::{Renderer, TemplateCatalog},
};

/// How often to report progress while writing output.
const PROGRESS_INTERVAL: usize = 10_000;

/// The accumulated result of rendering a run of input lines.
#[derive(Default)]
struct Run {
    /// Rendered pages, in input order.
    pages: Vec<RenderedPage>,
    /// Template signatures seen while rendering.
    catalog: TemplateCatalog,
    /// Pages which were not content pages.
    skipped: usize,
    /// Pages which failed to render.
    failed: usize,
    /// Input lines which were not valid page records.
    invalid: usize,
}

impl Run {
    /// Renders one input line into this run.
    fn add(mut self, config: &Configuration, line_number: usize, line: &str) -> Self {
        if line.trim().is_empty() {
            return self;
        }

        let page = match serde_json::from_str::<Page>(line) {
            Ok(page) => page,
            Err(err) => {
                log::warn!("Skipping invalid page record on line {line_number}: {err}");
                self.invalid += 1;
                return self;
            }
        };

        let result = {
            let mut renderer = Renderer::new(config).with_catalog(&mut self.catalog);
            pages::render_page(&page, &mut renderer)
        };

        match result {
            Ok(Some(rendered)) => self.pages.push(rendered),
            Ok(None) => self.skipped += 1,
            Err(err) => {
                log::warn!("{err}");
                self.failed += 1;
            }
        }
        self
    }

    /// Appends a later run to this one. Earlier template examples win.
    fn merge(mut self, other: Self) -> Self {
        self.pages.extend(other.pages);
        self.catalog.merge(other.catalog);
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.invalid += other.invalid;
        self
    }
}

fn usage<T>(err: &'static str) -> anyhow::Result<T> {
    let exe = std::env::args().next().unwrap_or_default();
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("Usage: {exe} [options] <pages.jsonl> <output.jsonl>\n");
    println!("or, use environment variables:");
    println!("    WIKI_FLATTEN_INPUT");
    println!("    WIKI_FLATTEN_OUTPUT\n");
    println!("Options:");
    println!("    --config <file>: JSON renderer configuration");
    println!("    --templates <file>: Write template signatures seen to a TSV file");
    println!("    --threads <n>: Number of render threads (default: one per CPU)\n");
    Err(anyhow::Error::msg(err))
}

fn free_arg(
    args: &mut pico_args::Arguments,
    key: &str,
    err: &'static str,
) -> anyhow::Result<String> {
    if let Some(arg) = args.opt_free_from_str::<String>()? {
        Ok(arg)
    } else if let Ok(arg) = std::env::var(key) {
        Ok(arg)
    } else {
        usage(err)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return usage("Help requested");
    }
    let config_path = args.opt_value_from_str::<_, String>("--config")?;
    let templates_path = args.opt_value_from_str::<_, String>("--templates")?;
    let threads = args.opt_value_from_str::<_, usize>("--threads")?;
    let _ = args.contains("--");
    let input_path = free_arg(&mut args, "WIKI_FLATTEN_INPUT", "Missing input file argument")?;
    let output_path = free_arg(
        &mut args,
        "WIKI_FLATTEN_OUTPUT",
        "Missing output file argument",
    )?;

    if !args.finish().is_empty() {
        return usage("Unknown extra arguments passed");
    }

    let config = match &config_path {
        Some(path) => Configuration::from_file(path)?,
        None => CONFIG.clone(),
    };

    if let Some(threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    log::info!("Reading pages from {input_path}");
    let time = Instant::now();
    let lines = BufReader::new(File::open(&input_path)?)
        .lines()
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("Read {} lines in {:.2?}", lines.len(), time.elapsed());

    let time = Instant::now();
    let run = lines
        .par_iter()
        .enumerate()
        .fold(Run::default, |run, (index, line)| {
            run.add(&config, index + 1, line)
        })
        .reduce(Run::default, Run::merge);
    log::info!(
        "Rendered {} pages in {:.2?}",
        run.pages.len(),
        time.elapsed()
    );

    let mut out = BufWriter::new(File::create(&output_path)?);
    for (index, page) in run.pages.iter().enumerate() {
        serde_json::to_writer(&mut out, page)?;
        out.write_all(b"\n")?;
        if (index + 1) % PROGRESS_INTERVAL == 0 {
            log::info!("Wrote {} pages", index + 1);
        }
    }
    out.flush()?;

    if let Some(path) = &templates_path {
        run.catalog.write_tsv(BufWriter::new(File::create(path)?))?;
        log::info!(
            "Wrote {} template signatures to {path}",
            run.catalog.len()
        );
    }

    log::info!(
        "Done: {} written, {} skipped, {} failed, {} invalid",
        run.pages.len(),
        run.skipped,
        run.failed,
        run.invalid
    );

    Ok(())
}
