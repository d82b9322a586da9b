use crmview_core::RemoteApi;

use crate::context::RequestContext;
use crate::query::QueryArgs;

/// Total number of records of the current list, for pagination.
///
/// `args` are the query arguments the listing ran with, after every
/// `query_parameters` stage, so the count sees the same filters. Lists of
/// other content types keep `default`. External lists ask the data
/// processor's count action instead. Any failure, including a missing or
/// unknown data processor, counts as `0` rather than `default` so stale
/// totals are never shown.
pub async fn resolve_total<A: RemoteApi>(
    api: &A,
    ctx: &mut RequestContext,
    args: &QueryArgs,
    default: u64,
) -> u64 {
    if !args.is_external() {
        return default;
    }
    let Some(id) = args.data_processor_id.as_deref().filter(|id| !id.is_empty()) else {
        return 0;
    };
    let Some(processor) = ctx.processor(api, id).await else {
        return 0;
    };

    let params = args.api_params.clone().unwrap_or_default().to_value();
    match api.call(&processor.entity, &processor.count_action, params).await {
        Ok(response) if !response.is_error => response
            .as_count()
            .unwrap_or(response.values.len() as u64),
        Ok(response) => {
            tracing::warn!(
                entity = %processor.entity,
                action = %processor.count_action,
                error = response.error_message.as_deref().unwrap_or("unknown error"),
                "count call failed"
            );
            0
        }
        Err(err) => {
            tracing::warn!(
                entity = %processor.entity,
                action = %processor.count_action,
                error = %err,
                "count call failed"
            );
            0
        }
    }
}
