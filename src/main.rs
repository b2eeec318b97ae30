use aws_config::BehaviorVersion;
use aws_lambda_events::event::s3::S3Event;
use aws_sdk_s3::Client as S3Client;
use inkan::config::PipelineConfig;
use inkan::handler::function_handler;
use inkan::pipeline::ImagePipeline;
use inkan::storage::S3ObjectStore;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

#[tokio::main]
async fn main() -> Result<(), Error> {
    inkan::logging::init_subscriber()?;

    let config = PipelineConfig::from_env()?;
    tracing::info!(
        source_bucket = %config.source_bucket,
        dest_bucket = %config.dest_bucket,
        watermark_text = %config.watermark.text,
        anchor = ?config.watermark.anchor,
        blend = ?config.watermark.blend,
        "configuration loaded"
    );

    // The S3 client is constructed once per container at cold start and
    // shared read-only across invocations
    let shared_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let store = S3ObjectStore::new(S3Client::new(&shared_config));
    let pipeline = ImagePipeline::new(store, config);

    run(service_fn(|event: LambdaEvent<S3Event>| {
        function_handler(event, &pipeline)
    }))
    .await
}
