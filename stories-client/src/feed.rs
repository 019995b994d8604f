use stories_core::{
    ComposeForm, CoreError, LikeChange, Post, PostCard, PostDetail, PostQuery, PostStore, Viewer,
};
use tracing::{error, info, warn};

use crate::error::StoriesClientResult;
use crate::http_client::PostsApi;
use crate::likes::LikeRecords;
use crate::media::{ImageFile, MediaHost};

/// Лента постов: локальный [`PostStore`] плюс удалённые API.
///
/// Список берётся целиком из блог-API, фильтрация и сортировка выполняются
/// локально. Лайки меняются оптимистично: сначала локальное состояние, затем
/// запись в хранилище лайков без отката при ошибке.
pub struct StoryFeed<A, M, L> {
    api: A,
    media: M,
    likes: L,
    store: PostStore,
    viewer: Option<Viewer>,
}

impl<A, M, L> StoryFeed<A, M, L>
where
    A: PostsApi,
    M: MediaHost,
    L: LikeRecords,
{
    /// Создаёт ленту без авторизованного пользователя и с пустым списком.
    pub fn new(api: A, media: M, likes: L) -> Self {
        Self {
            api,
            media,
            likes,
            store: PostStore::new(),
            viewer: None,
        }
    }

    /// Устанавливает текущего пользователя.
    pub fn sign_in(&mut self, viewer: Viewer) {
        self.viewer = Some(viewer);
    }

    /// Сбрасывает текущего пользователя.
    pub fn sign_out(&mut self) {
        self.viewer = None;
    }

    /// Текущий пользователь.
    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    /// Локальное хранилище постов.
    pub fn store(&self) -> &PostStore {
        &self.store
    }

    /// Отфильтрованные и отсортированные посты.
    pub fn visible(&self, query: &PostQuery) -> Vec<&Post> {
        self.store.visible(query)
    }

    /// Карточки для сетки постов.
    pub fn cards(&self, query: &PostQuery) -> Vec<PostCard> {
        self.visible(query)
            .into_iter()
            .map(|post| PostCard::new(post, self.viewer.as_ref()))
            .collect()
    }

    /// Полный пост для модального окна.
    pub fn detail(&self, post_id: &str) -> StoriesClientResult<PostDetail> {
        self.store
            .get(post_id)
            .map(PostDetail::from)
            .ok_or_else(|| CoreError::PostNotFound(post_id.to_string()).into())
    }

    /// Перечитывает список постов.
    ///
    /// При ошибке список очищается, ошибка логируется и возвращается.
    pub async fn refresh(&mut self) -> StoriesClientResult<usize> {
        match self.api.list_posts().await {
            Ok(posts) => {
                info!(count = posts.len(), "posts loaded");
                self.store.replace_all(posts);
                Ok(self.store.len())
            }
            Err(err) => {
                error!("Error fetching posts: {err}");
                self.store.clear();
                Err(err)
            }
        }
    }

    /// Переключает лайк текущего пользователя.
    ///
    /// Локальное состояние меняется до удалённой записи и не откатывается,
    /// если запись не удалась: ошибка возвращается, а расхождение исправит
    /// следующий [`StoryFeed::refresh`].
    pub async fn toggle_like(&mut self, post_id: &str) -> StoriesClientResult<LikeChange> {
        let viewer_id = self
            .viewer
            .as_ref()
            .map(|viewer| viewer.id.clone())
            .ok_or(CoreError::NotSignedIn)?;

        if self.store.get(post_id).is_none() {
            return Err(CoreError::PostNotFound(post_id.to_string()).into());
        }

        // флаг из блог-API не привязан к пользователю, источник истины здесь хранилище лайков
        match self.likes.has_like(post_id, &viewer_id).await {
            Ok(liked) => self.store.set_liked(post_id, liked)?,
            Err(err) => warn!(post_id, "Error checking like state: {err}"),
        }

        let change = self.store.toggle_like(post_id)?;

        if let Err(err) = self.sync_like(post_id, &viewer_id, change).await {
            warn!(post_id, liked = change.liked, "Error updating like: {err}");
            return Err(err);
        }
        Ok(change)
    }

    async fn sync_like(&self, post_id: &str, viewer_id: &str, change: LikeChange) -> StoriesClientResult<()> {
        if change.liked {
            self.likes.add_like(post_id, viewer_id).await?;
        } else if !self.likes.remove_like(post_id, viewer_id).await? {
            warn!(post_id, viewer_id, "no like record to remove");
        }
        self.likes.set_like_count(post_id, change.likes).await
    }

    /// Публикует пост: проверка формы, загрузка картинки (если есть),
    /// создание поста и перечитывание списка.
    ///
    /// Ошибка перечитывания после успешного создания не считается ошибкой
    /// публикации.
    pub async fn publish(&mut self, form: ComposeForm, image: Option<ImageFile>) -> StoriesClientResult<()> {
        let viewer = self.viewer.clone().ok_or(CoreError::NotSignedIn)?;
        form.check()?;

        let image_url = match image {
            Some(image) => Some(self.media.upload(image).await?),
            None => None,
        };

        let new_post = form.into_new_post(&viewer, image_url)?;
        self.api.create_post(&new_post).await?;
        info!(title = %new_post.title, "post published");

        // refresh сам логирует ошибку и очищает список
        let _ = self.refresh().await;
        Ok(())
    }
}
