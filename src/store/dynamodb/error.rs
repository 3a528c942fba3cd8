//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;

use crate::store::StoreError;

/// Map a GetItem SDK error to StoreError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> StoreError {
    match err.as_service_error() {
        Some(GetItemError::ResourceNotFoundException(_)) => table_not_found(),
        Some(GetItemError::ProvisionedThroughputExceededException(_)) => throughput_exceeded(),
        _ => StoreError::QueryFailed(format!("GetItem failed: {}", DisplayErrorContext(&err))),
    }
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> StoreError {
    match err.as_service_error() {
        Some(PutItemError::ResourceNotFoundException(_)) => table_not_found(),
        Some(PutItemError::ProvisionedThroughputExceededException(_)) => throughput_exceeded(),
        _ => StoreError::QueryFailed(format!("PutItem failed: {}", DisplayErrorContext(&err))),
    }
}

/// Map an UpdateItem SDK error to StoreError.
///
/// A failed existence condition means the key is absent.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    id: &str,
) -> StoreError {
    match err.as_service_error() {
        Some(UpdateItemError::ConditionalCheckFailedException(_)) => StoreError::NotFound {
            id: id.to_string(),
        },
        Some(UpdateItemError::ResourceNotFoundException(_)) => table_not_found(),
        Some(UpdateItemError::ProvisionedThroughputExceededException(_)) => throughput_exceeded(),
        _ => StoreError::QueryFailed(format!(
            "UpdateItem failed: {}",
            DisplayErrorContext(&err)
        )),
    }
}

/// Map a DeleteItem SDK error to StoreError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    id: &str,
) -> StoreError {
    match err.as_service_error() {
        Some(DeleteItemError::ConditionalCheckFailedException(_)) => StoreError::NotFound {
            id: id.to_string(),
        },
        Some(DeleteItemError::ResourceNotFoundException(_)) => table_not_found(),
        Some(DeleteItemError::ProvisionedThroughputExceededException(_)) => throughput_exceeded(),
        _ => StoreError::QueryFailed(format!(
            "DeleteItem failed: {}",
            DisplayErrorContext(&err)
        )),
    }
}

/// Map a Scan SDK error to StoreError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(err: SdkError<ScanError, R>) -> StoreError {
    match err.as_service_error() {
        Some(ScanError::ResourceNotFoundException(_)) => table_not_found(),
        Some(ScanError::ProvisionedThroughputExceededException(_)) => throughput_exceeded(),
        _ => StoreError::QueryFailed(format!("Scan failed: {}", DisplayErrorContext(&err))),
    }
}

/// Map a DescribeTable SDK error to StoreError.
pub fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
) -> StoreError {
    match err.as_service_error() {
        Some(DescribeTableError::ResourceNotFoundException(_)) => table_not_found(),
        _ => StoreError::ConnectionFailed(format!(
            "DescribeTable failed: {}",
            DisplayErrorContext(&err)
        )),
    }
}

fn table_not_found() -> StoreError {
    StoreError::QueryFailed("Table not found".to_string())
}

fn throughput_exceeded() -> StoreError {
    StoreError::QueryFailed("Throughput exceeded, please retry".to_string())
}
