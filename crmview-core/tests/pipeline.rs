use crmview_core::pipeline::{points, stage_fn, Pipeline, Stage, StageFuture};

#[derive(Default)]
struct Trace {
    seen: Vec<&'static str>,
}

struct Suffix(&'static str);

impl Stage<String, str, Trace> for Suffix {
    fn name(&self) -> &'static str {
        self.0
    }

    fn apply<'a>(&'a self, input: String, args: &'a str, ctx: &'a mut Trace) -> StageFuture<'a, String> {
        Box::pin(async move {
            ctx.seen.push(self.0);
            format!("{input}{}{args}", self.0)
        })
    }
}

#[tokio::test]
async fn runs_stages_by_priority() {
    let pipeline = Pipeline::<String, str, Trace>::new(points::FIELD_HREF)
        .with(10, Suffix("b"))
        .with(5, Suffix("a"))
        .with(10, Suffix("c"));

    assert_eq!(pipeline.names(), vec!["a", "b", "c"]);

    let mut trace = Trace::default();
    let out = pipeline.run(String::new(), "-", &mut trace).await;
    assert_eq!(out, "a-b-c-");
    assert_eq!(trace.seen, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn empty_pipeline_returns_input() {
    let pipeline = Pipeline::<u64, (), ()>::new(points::TOTAL_ITEMS);
    assert!(pipeline.is_empty());
    assert_eq!(pipeline.run(12, &(), &mut ()).await, 12);
}

#[tokio::test]
async fn closure_stages() {
    let mut pipeline = Pipeline::<u64, u64, Vec<u64>>::new(points::TOTAL_ITEMS);
    pipeline
        .add(10, stage_fn("double", |n: u64, _: &u64, _: &mut Vec<u64>| n * 2))
        .add(
            20,
            stage_fn("add", |n: u64, extra: &u64, log: &mut Vec<u64>| {
                log.push(n);
                n + extra
            }),
        );

    let mut log = Vec::new();
    assert_eq!(pipeline.run(4, &3, &mut log).await, 11);
    assert_eq!(log, vec![8]);
    assert_eq!(pipeline.len(), 2);
    assert_eq!(pipeline.point(), "total_items");
}
