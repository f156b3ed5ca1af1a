//! Command-line embedding printer.
//!
//! Reads a TIR module from a file or stdin, computes embeddings against a
//! vocabulary and prints them at the requested granularity.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use irvec::test_ir::{TestIr, TestIrAdaptor};
use irvec::{load_vocabulary, Embedder, EmbedderKind, IrAdaptor, VocabConfig, Vocabulary};

#[derive(Parser)]
#[command(name = "irvec")]
#[command(about = "Compute flow-aware vector embeddings for TIR modules")]
#[command(version)]
struct Cli {
    /// Vocabulary JSON document with Opcodes, Types and Arguments sections
    #[arg(long)]
    vocab: PathBuf,

    /// TIR module to embed; reads stdin when omitted
    input: Option<PathBuf>,

    /// Granularity of the printed vectors
    #[arg(long, value_enum, default_value = "func")]
    level: Level,

    /// Weight applied to the opcode section at load time
    #[arg(long, default_value_t = 1.0)]
    opcode_weight: f64,

    /// Weight applied to the type section at load time
    #[arg(long, default_value_t = 0.5)]
    type_weight: f64,

    /// Weight applied to the argument section at load time
    #[arg(long, default_value_t = 0.2)]
    arg_weight: f64,

    /// Print the scaled vocabulary and exit
    #[arg(long)]
    dump_vocab: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Level {
    /// One vector per function
    Func,
    /// One vector per basic block
    Bb,
    /// One vector per instruction
    Inst,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = VocabConfig {
        path: Some(cli.vocab.clone()),
        opcode_weight: cli.opcode_weight,
        type_weight: cli.type_weight,
        arg_weight: cli.arg_weight,
    };
    let vocab = load_vocabulary(&config)?;

    if cli.dump_vocab {
        dump_vocab(&vocab);
        return Ok(());
    }

    let text = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let ir = TestIr::parse(&text)?;
    let adaptor = TestIrAdaptor::new(&ir);

    for func in adaptor.funcs() {
        let Some(embedder) = Embedder::create(EmbedderKind::Symbolic, &adaptor, func, &vocab)
        else {
            continue;
        };
        println!("Embeddings for function {}:", adaptor.func_name(func));
        match cli.level {
            Level::Func => {
                println!("Function vector: {}", embedder.function_vector());
            }
            Level::Bb => {
                println!("Basic block vectors:");
                for block in adaptor.func_blocks(func) {
                    // Unreachable blocks have no vector.
                    if let Some(vec) = embedder.block_vector(block) {
                        println!("Basic block: {}: {}", adaptor.block_name(block), *vec);
                    }
                }
            }
            Level::Inst => {
                println!("Instruction vectors:");
                let inst_map = embedder.inst_vec_map();
                for block in adaptor.func_blocks(func) {
                    for inst in adaptor.block_insts(block) {
                        if let Some(vec) = inst_map.get(&inst) {
                            let name = adaptor.inst_name(inst);
                            if name.is_empty() {
                                println!(
                                    "Instruction: {}: {}",
                                    adaptor.inst_opcode_name(inst),
                                    vec
                                );
                            } else {
                                println!(
                                    "Instruction: %{} = {}: {}",
                                    name,
                                    adaptor.inst_opcode_name(inst),
                                    vec
                                );
                            }
                        }
                    }
                }
            }
        }
        if embedder.vocab_misses() > 0 {
            eprintln!(
                "warning: {} vocabulary misses in function {}",
                embedder.vocab_misses(),
                adaptor.func_name(func)
            );
        }
    }
    Ok(())
}

fn dump_vocab(vocab: &Vocabulary) {
    println!("Vocabulary size: {}", vocab.len());
    println!("Dimension: {}", vocab.dimension());
    let mut entries: Vec<_> = vocab.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (key, vec) in entries {
        println!("{key}: {vec}");
    }
}
