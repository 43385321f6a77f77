/// Generates the plain reads every client exposes: `get_<name>` (missing is `None`)
/// and `find_<name>` (missing is the domain's `NotFound`).
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            #[allow(dead_code)]
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](&self, id: String) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.get(id).await.map_err(<$error>::from)
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<find_ $entity_name_snake>](&self, id: String) -> Result<$entity, $error> {
                    tracing::debug!("Sending request");
                    self.inner
                        .get(id.clone())
                        .await?
                        .ok_or_else(|| <$error>::from($crate::actor_framework::FrameworkError::NotFound(id)))
                }
            }
        }
    };
}

/// Constructor for clients that wrap a collection and a clock.
macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(
                inner: $crate::actor_framework::ResourceClient<$entity>,
                clock: std::sync::Arc<dyn $crate::clock::Clock>,
            ) -> Self {
                Self { inner, clock }
            }
        }
    };
}

macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        impl_client_new!($client_name, $entity);
        impl_client_methods!($client_name, $entity, $error, $entity_name_snake);
    };
}
