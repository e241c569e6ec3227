use crate::domain::{OrderCategory, OrderHistoryOptions, Pagination};

/// Query string for paged history endpoints. Unset fields are omitted.
pub fn encode_pagination_query(pagination: &Pagination) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    if let Some(limit) = pagination.limit {
        params.push(("limit".to_owned(), limit.to_string()));
    }
    if let Some(offset) = pagination.offset {
        params.push(("offset".to_owned(), offset.to_string()));
    }
    if let Some(order) = pagination.order.as_ref() {
        params.push(("order".to_owned(), order.clone()));
    }
    if let Some(reverse) = pagination.reverse {
        params.push(("reverse".to_owned(), reverse.to_string()));
    }
    params
}

pub fn encode_order_history_query(options: &OrderHistoryOptions) -> Vec<(String, String)> {
    let mut params = encode_pagination_query(&options.pagination);
    if let Some(category) = options.category {
        params.push((OrderCategory::FIELD.to_owned(), category.as_str().to_owned()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_forwards_exactly_the_set_fields() {
        let pagination = Pagination {
            limit: Some(10),
            offset: Some(5),
            order: Some("id".to_owned()),
            reverse: Some(true),
        };
        assert_eq!(
            encode_pagination_query(&pagination),
            vec![
                ("limit".to_owned(), "10".to_owned()),
                ("offset".to_owned(), "5".to_owned()),
                ("order".to_owned(), "id".to_owned()),
                ("reverse".to_owned(), "true".to_owned()),
            ]
        );
    }

    #[test]
    fn pagination_omits_unset_fields() {
        assert!(encode_pagination_query(&Pagination::default()).is_empty());

        let pagination = Pagination {
            offset: Some(0),
            ..Default::default()
        };
        assert_eq!(
            encode_pagination_query(&pagination),
            vec![("offset".to_owned(), "0".to_owned())]
        );
    }

    #[test]
    fn order_history_appends_category() {
        let options = OrderHistoryOptions {
            pagination: Pagination {
                limit: Some(1),
                ..Default::default()
            },
            category: Some(OrderCategory::Activation),
        };
        assert_eq!(
            encode_order_history_query(&options),
            vec![
                ("limit".to_owned(), "1".to_owned()),
                ("category".to_owned(), "activation".to_owned()),
            ]
        );
    }
}
