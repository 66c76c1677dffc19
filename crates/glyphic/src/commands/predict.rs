use crate::engine::{print_json, Engine};
use glyphic_learn::{CategoryIntent, PredictionRequest, Suggestion};
use glyphic_telemetry::Paths;

pub struct PredictArgs<'a> {
    pub user: &'a str,
    pub symbols: &'a [String],
    pub limit: usize,
    pub offset: usize,
    pub language: &'a str,
    pub board: Option<&'a str>,
    pub category: Option<&'a str>,
}

pub fn predict(engine: &Engine, args: &PredictArgs<'_>) -> anyhow::Result<Vec<Suggestion>> {
    let sequence = engine.resolve(args.symbols, args.language);
    let mut request = PredictionRequest::new(args.user, sequence)
        .with_limit(args.limit)
        .with_offset(args.offset)
        .with_language(args.language);
    if let Some(board) = args.board {
        request = request.with_board(board);
    }
    if let Some(category) = args.category {
        let intent: CategoryIntent = category.parse().map_err(anyhow::Error::msg)?;
        request = request.with_category(intent);
    }
    Ok(engine.predictor().predict_next(&request))
}

pub fn run(args: &PredictArgs<'_>) -> anyhow::Result<()> {
    let engine = Engine::open(Paths::new()?)?;
    print_json(&predict(&engine, args)?)
}
