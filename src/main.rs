// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{anyhow, bail, Context};
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::process;

use the_dagflow::config::consts::DEFAULT_LOG_FILTER;
use the_dagflow::config::{load_config, PipelineConfig};
use the_dagflow::observability::init_tracing;
use the_dagflow::{Call, DataContainer, Graph, Runtime, Value};

fn usage(program: &str) {
    eprintln!("Usage: {} run <pipeline.yaml|toml> [name=json ...]", program);
    eprintln!("       {} save <pipeline.yaml|toml> <out> [--password pw]", program);
    eprintln!("       {} load <blob> [--checksum sha256] [--password pw] [name=json ...]", program);
    eprintln!("Example: {} run configs/offset-pipeline.yaml 'zero=[0, 1]' 'one=[1, 2]'", program);
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("the-dagflow");

    if args.len() < 3 {
        usage(program);
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => run_pipeline(&args[2..]),
        "save" => save_pipeline(&args[2..]),
        "load" => load_blob(&args[2..]),
        other => {
            eprintln!("Unknown command '{}'", other);
            usage(program);
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("❌ {:#}", e);
        process::exit(1);
    }
}

/// Load the pipeline file and start tracing at its configured level.
fn open_pipeline(path: &str) -> anyhow::Result<(PipelineConfig, Graph)> {
    let config = load_config(path).with_context(|| format!("loading {}", path))?;
    init_tracing(config.execution.log_level.as_deref().unwrap_or(DEFAULT_LOG_FILTER));

    let graph = config.build(config.runtime().shared())?;
    Ok((config, graph))
}

fn run_pipeline(args: &[String]) -> anyhow::Result<()> {
    let (_config, mut graph) = open_pipeline(&args[0])?;
    let inputs = parse_inputs(&args[1..])?;
    execute(&mut graph, inputs)
}

fn save_pipeline(args: &[String]) -> anyhow::Result<()> {
    let [pipeline, out, rest @ ..] = args else {
        bail!("save needs a pipeline file and an output path");
    };
    let (mut flags, _) = split_flags(rest, &["--password"])?;
    let password = flags.remove("--password");
    let (_config, graph) = open_pipeline(pipeline)?;

    let checksum = graph.save_to_path(out, password.as_deref())?;
    graph.runtime().loggers.get("cli").info(&format!("Saved {} to {}", pipeline, out));
    println!("{}", checksum);
    Ok(())
}

fn load_blob(args: &[String]) -> anyhow::Result<()> {
    let [blob, rest @ ..] = args else {
        bail!("load needs a saved graph");
    };
    let (mut flags, rest) = split_flags(rest, &["--checksum", "--password"])?;
    let password = flags.remove("--password");
    let checksum = flags.remove("--checksum");
    init_tracing(DEFAULT_LOG_FILTER);

    let mut graph = Graph::load_from_path(
        Runtime::new().shared(),
        blob,
        password.as_deref(),
        checksum.as_deref(),
    )?;
    let inputs = parse_inputs(rest)?;
    execute(&mut graph, inputs)
}

fn execute(graph: &mut Graph, inputs: Vec<(String, DataContainer)>) -> anyhow::Result<()> {
    let call = inputs
        .into_iter()
        .fold(Call::new(), |call, (name, data)| call.kwarg(name, data));

    let results: HashMap<String, DataContainer> = graph.process(call)?;
    let ordered: BTreeMap<String, serde_json::Value> = results
        .into_iter()
        .map(|(name, data)| (name, data.to_value().to_json()))
        .collect();

    println!("{}", serde_json::to_string_pretty(&ordered)?);
    Ok(())
}

/// Leading `--flag value` pairs, which must come before any inputs.
fn split_flags<'a>(
    args: &'a [String],
    allowed: &[&str],
) -> anyhow::Result<(HashMap<String, String>, &'a [String])> {
    let mut flags = HashMap::new();
    let mut rest = args;

    while let [flag, tail @ ..] = rest {
        if !flag.starts_with("--") {
            break;
        }
        if !allowed.contains(&flag.as_str()) {
            bail!("unknown option '{}'", flag);
        }
        let [value, tail @ ..] = tail else {
            bail!("{} needs a value", flag);
        };
        flags.insert(flag.clone(), value.clone());
        rest = tail;
    }

    if rest.iter().any(|arg| arg.starts_with("--")) {
        bail!("options must come before any inputs");
    }
    Ok((flags, rest))
}

/// Inputs are `name=json`, where the JSON is an array holding the batch.
fn parse_inputs(args: &[String]) -> anyhow::Result<Vec<(String, DataContainer)>> {
    args.iter()
        .map(|arg| -> anyhow::Result<(String, DataContainer)> {
            let (name, json) = arg
                .split_once('=')
                .ok_or_else(|| anyhow!("input '{}' is not of the form name=json", arg))?;
            let parsed: serde_json::Value =
                serde_json::from_str(json).with_context(|| format!("input '{}' is not valid JSON", name))?;
            let data = DataContainer::from_value(Value::from_json(&parsed))
                .map_err(|value| anyhow!("input '{}' must be a JSON array, got {}", name, value.type_tag()))?;
            Ok((name.to_string(), data))
        })
        .collect()
}
